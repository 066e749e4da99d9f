//! Password strength signals for the change-password meter.

use std::any::{Any, TypeId};

use truthy_states::{
    Compute, ComputeDeps, Dep, SnapshotClone, State, Updater, assign_impl, state_assign_impl,
};

use crate::form::{ValidationError, ValidationKind, ValidatorCtx};
use crate::messages::MessageKey;

/// Number of steps drawn by the strength meter.
pub const STRENGTH_STEPS: usize = 4;

pub const MIN_STRONG_PASSWORD_LEN: usize = 6;

/// Which character classes a password contains.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    /// Anything outside `[A-Za-z0-9]`.
    pub special: bool,
}

impl PasswordStrength {
    pub fn evaluate(password: &str) -> Self {
        password.chars().fold(Self::default(), |acc, c| Self {
            lowercase: acc.lowercase || c.is_ascii_lowercase(),
            uppercase: acc.uppercase || c.is_ascii_uppercase(),
            digit: acc.digit || c.is_ascii_digit(),
            special: acc.special || !c.is_ascii_alphanumeric(),
        })
    }

    pub fn signals(&self) -> [bool; STRENGTH_STEPS] {
        [self.lowercase, self.uppercase, self.digit, self.special]
    }

    pub fn score(&self) -> usize {
        self.signals().into_iter().filter(|s| *s).count()
    }

    /// Share of satisfied signals, `0.0..=100.0`.
    pub fn percent(&self) -> f32 {
        self.score() as f32 / STRENGTH_STEPS as f32 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.score() == STRENGTH_STEPS
    }
}

/// Every character class plus the minimum length.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_STRONG_PASSWORD_LEN
        && PasswordStrength::evaluate(password).is_complete()
}

/// Form validator for the new-password field.
///
/// Empty input passes here; the required rule reports it.
pub fn check_if_strong_password(ctx: &ValidatorCtx<'_>) -> Result<(), ValidationError> {
    if ctx.value.is_empty() || is_strong_password(ctx.value) {
        Ok(())
    } else {
        Err(ctx.reject(ValidationKind::WeakPassword, MessageKey::WeakPassword))
    }
}

/// The password typed into the change-password form but not yet submitted.
#[derive(Debug, Default, Clone)]
pub struct PasswordDraft {
    pub password: String,
}

impl SnapshotClone for PasswordDraft {}

impl State for PasswordDraft {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Strength of the current [`PasswordDraft`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordStrengthCompute {
    pub strength: PasswordStrength,
}

impl SnapshotClone for PasswordStrengthCompute {}

impl Compute for PasswordStrengthCompute {
    fn deps(&self) -> ComputeDeps {
        (vec![TypeId::of::<PasswordDraft>()], vec![])
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let draft = deps.get_state_ref::<PasswordDraft>();
        updater.set(Self {
            strength: PasswordStrength::evaluate(&draft.password),
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use truthy_states::StateCtx;

    use super::*;
    use crate::form::{FieldSpec, FormInstance};
    use crate::messages::EnglishMessages;

    #[test]
    fn every_class_scores_full() {
        let strength = PasswordStrength::evaluate("Abc123!@");
        assert_eq!(strength.signals(), [true, true, true, true]);
        assert_eq!(strength.percent(), 100.0);
    }

    #[test]
    fn lowercase_only_scores_a_quarter() {
        let strength = PasswordStrength::evaluate("abcdefg");
        assert_eq!(strength.signals(), [true, false, false, false]);
        assert_eq!(strength.percent(), 25.0);
    }

    #[test]
    fn empty_password_scores_zero() {
        let strength = PasswordStrength::evaluate("");
        assert_eq!(strength, PasswordStrength::default());
        assert_eq!(strength.percent(), 0.0);
    }

    #[test]
    fn whitespace_and_non_ascii_count_as_special() {
        assert!(PasswordStrength::evaluate("a b").special);
        assert!(PasswordStrength::evaluate("é").special);
        assert!(!PasswordStrength::evaluate("aZ9").special);
    }

    #[test]
    fn strong_password_needs_length_too() {
        assert!(is_strong_password("Abc12!"));
        assert!(!is_strong_password("Ab1!"));
        assert!(!is_strong_password("abcdef12"));
    }

    #[test]
    fn validator_defers_empty_input_to_required_rule() {
        let mut form = FormInstance::new(
            vec![FieldSpec::new("password").validator(check_if_strong_password)],
            Arc::new(EnglishMessages),
        );
        assert!(form.validate_fields().is_ok());

        form.set_value("password", "weakpass");
        let errors = form.validate_fields().expect_err("weak");
        assert_eq!(errors[0].kind, ValidationKind::WeakPassword);
    }

    #[test]
    fn compute_tracks_the_draft() {
        let mut ctx = StateCtx::new();
        ctx.add_state(PasswordDraft::default());
        ctx.record_compute(PasswordStrengthCompute::default());
        ctx.run_computed();
        assert_eq!(ctx.compute::<PasswordStrengthCompute>().strength.score(), 0);

        ctx.update::<PasswordDraft>(|d| d.password = "Ab1".to_owned());
        ctx.run_computed();
        assert_eq!(ctx.compute::<PasswordStrengthCompute>().strength.score(), 3);
    }
}
