//! Balance collaborator
//!
//! The core only needs `debit` at round start and `credit` at resolution.
//! Storage and display belong to the host. Each call is one atomic
//! read-modify-write, so rounds in different games can share a balance.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::consts::DEFAULT_BALANCE;
use crate::error::{ArcadeError, Result};

pub trait Wallet {
    fn balance(&self) -> f64;

    /// Withdraw a bet; fails without mutation when funds are short
    fn debit(&self, amount: f64) -> Result<()>;

    /// Pay out winnings
    fn credit(&self, amount: f64);
}

/// In-memory balance shared by every game
#[derive(Debug, Clone)]
pub struct SharedBalance {
    inner: Arc<Mutex<f64>>,
}

impl Default for SharedBalance {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}

impl SharedBalance {
    pub fn new(initial: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, f64> {
        // A panic mid-update cannot leave a half-written f64
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restore the starting balance
    pub fn reset(&self) {
        *self.lock() = DEFAULT_BALANCE;
        log::info!("Balance reset to {DEFAULT_BALANCE:.2}");
    }
}

impl Wallet for SharedBalance {
    fn balance(&self) -> f64 {
        *self.lock()
    }

    fn debit(&self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ArcadeError::invalid(format!("cannot debit {amount}")));
        }
        let mut balance = self.lock();
        if amount > *balance {
            return Err(ArcadeError::InsufficientFunds {
                bet: amount,
                balance: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        *self.lock() += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_debit_and_credit() {
        let wallet = SharedBalance::new(100.0);
        wallet.debit(40.0).unwrap();
        assert_eq!(wallet.balance(), 60.0);
        wallet.credit(10.0);
        assert_eq!(wallet.balance(), 70.0);
    }

    #[test]
    fn test_insufficient_funds_leaves_balance() {
        let wallet = SharedBalance::new(10.0);
        let err = wallet.debit(10.5).unwrap_err();
        assert_eq!(
            err,
            ArcadeError::InsufficientFunds {
                bet: 10.5,
                balance: 10.0
            }
        );
        assert_eq!(wallet.balance(), 10.0);
    }

    #[test]
    fn test_rejects_bad_amounts() {
        let wallet = SharedBalance::new(10.0);
        assert!(wallet.debit(-1.0).is_err());
        assert!(wallet.debit(f64::NAN).is_err());
        wallet.credit(f64::INFINITY);
        wallet.credit(-5.0);
        assert_eq!(wallet.balance(), 10.0);
    }

    #[test]
    fn test_clones_share_balance() {
        let a = SharedBalance::new(50.0);
        let b = a.clone();
        b.debit(20.0).unwrap();
        assert_eq!(a.balance(), 30.0);
        a.reset();
        assert_eq!(b.balance(), DEFAULT_BALANCE);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let wallet = SharedBalance::new(0.0);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let w = wallet.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        w.credit(1.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(wallet.balance(), 8_000.0);
    }
}
