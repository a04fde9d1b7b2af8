//! Bounded rejection sampling.
//!
//! Both the derangement engine and the passphrase mint draw candidates until
//! one is acceptable. A rejected candidate is an ordinary `None`, not an
//! error; running out of attempts is reported as [`Outcome::Exhausted`].

/// Result of a bounded sampling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
  /// `value` was accepted on attempt number `attempt` (1-based).
  Accepted { value: T, attempt: u32 },
  /// Every one of `attempts` candidates was rejected.
  Exhausted { attempts: u32 },
}

impl<T> Outcome<T> {
  pub fn is_accepted(&self) -> bool { matches!(self, Self::Accepted { .. }) }

  pub fn into_option(self) -> Option<T> {
    match self {
      Self::Accepted { value, .. } => Some(value),
      Self::Exhausted { .. } => None,
    }
  }
}

/// Call `draw` with attempt numbers `1..=max_attempts` until it yields a value.
pub fn sample_bounded<T, F>(max_attempts: u32, mut draw: F) -> Outcome<T>
where
  F: FnMut(u32) -> Option<T>,
{
  for attempt in 1..=max_attempts {
    if let Some(value) = draw(attempt) {
      return Outcome::Accepted { value, attempt };
    }
  }
  Outcome::Exhausted { attempts: max_attempts }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_budget_never_draws() {
    let mut calls = 0;
    let outcome: Outcome<()> = sample_bounded(0, |_| {
      calls += 1;
      Some(())
    });
    assert_eq!(outcome, Outcome::Exhausted { attempts: 0 });
    assert_eq!(calls, 0);
  }

  #[test]
  fn reports_accepting_attempt() {
    let outcome = sample_bounded(10, |n| (n == 4).then_some(n * 10));
    assert_eq!(outcome, Outcome::Accepted { value: 40, attempt: 4 });
  }

  #[test]
  fn stops_at_budget() {
    let mut calls = 0;
    let outcome: Outcome<u32> = sample_bounded(7, |_| {
      calls += 1;
      None
    });
    assert_eq!(outcome, Outcome::Exhausted { attempts: 7 });
    assert_eq!(calls, 7);
    assert!(outcome.into_option().is_none());
  }
}
