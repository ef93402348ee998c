// Utility Module
// File persistence used by the command-line front end

pub mod key_file;
