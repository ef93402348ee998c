// Retry budgets for key generation and the factorization attack
// Every search loop in the crate is bounded by one of these values

/// Budgets for prime, distinct-prime and exponent searches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Random candidates drawn per prime before giving up
    pub prime_attempts: u32,
    /// Draws of q allowed while q == p
    pub distinct_prime_attempts: u32,
    /// Random exponents drawn while gcd(e, φ(n)) != 1
    pub exponent_attempts: u32,
    /// Miller-Rabin witness rounds
    pub primality_rounds: u32,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            prime_attempts: 10_000,
            distinct_prime_attempts: 64,
            exponent_attempts: 10_000,
            primality_rounds: 20,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_attempts(mut self, attempts: u32) -> Self {
        self.prime_attempts = attempts;
        self
    }

    pub fn with_distinct_prime_attempts(mut self, attempts: u32) -> Self {
        self.distinct_prime_attempts = attempts;
        self
    }

    pub fn with_exponent_attempts(mut self, attempts: u32) -> Self {
        self.exponent_attempts = attempts;
        self
    }

    pub fn with_primality_rounds(mut self, rounds: u32) -> Self {
        self.primality_rounds = rounds;
        self
    }
}

/// Budget for the order-finding attack
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackConfig {
    /// Random bases tried before reporting failure
    pub max_attempts: u32,
    /// Largest period scanned per base. `None` scans up to n.
    pub period_limit: Option<u64>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1_000,
            period_limit: None,
        }
    }
}

impl AttackConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_period_limit(mut self, limit: u64) -> Self {
        self.period_limit = Some(limit);
        self
    }
}
