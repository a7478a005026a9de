//! Realistic-looking text values.

use fake::faker::company::en::CatchPhrase;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;

/// Source of human-readable fake text.
pub trait FakeText {
    /// A product-style marketing phrase, e.g. "Adaptive client-driven framework".
    fn catch_phrase<R: Rng>(&self, rng: &mut R) -> String;

    /// A person's full name.
    fn name<R: Rng>(&self, rng: &mut R) -> String;

    /// An email address with exactly one `@`.
    fn email<R: Rng>(&self, rng: &mut R) -> String;
}

/// English-locale fakers from the `fake` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnFaker;

impl FakeText for EnFaker {
    fn catch_phrase<R: Rng>(&self, rng: &mut R) -> String {
        CatchPhrase().fake_with_rng(rng)
    }

    fn name<R: Rng>(&self, rng: &mut R) -> String {
        Name().fake_with_rng(rng)
    }

    fn email<R: Rng>(&self, rng: &mut R) -> String {
        SafeEmail().fake_with_rng(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catch_phrase_is_multi_word() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let phrase = EnFaker.catch_phrase(&mut rng);
            assert!(phrase.split_whitespace().count() >= 2, "{phrase}");
        }
    }

    #[test]
    fn test_name_is_not_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let name = EnFaker.name(&mut rng);
            assert!(!name.trim().is_empty());
        }
    }

    #[test]
    fn test_email_has_single_at() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let email = EnFaker.email(&mut rng);
            assert_eq!(email.matches('@').count(), 1, "{email}");
            let (local, domain) = email.split_once('@').unwrap();
            assert!(!local.is_empty());
            assert!(domain.contains('.'));
        }
    }

    #[test]
    fn test_same_seed_same_text() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(EnFaker.name(&mut a), EnFaker.name(&mut b));
        assert_eq!(EnFaker.email(&mut a), EnFaker.email(&mut b));
        assert_eq!(EnFaker.catch_phrase(&mut a), EnFaker.catch_phrase(&mut b));
    }
}
