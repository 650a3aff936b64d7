//! Field-scoped validation for the sign-up, sign-in and recipe forms.
//!
//! Every rule a field violates is reported, in rule order, under that
//! field's wire name.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::FieldErrors;
use crate::types::RecipeForm;

const PASSWORD_SPECIALS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Default)]
struct Collector {
    errors: FieldErrors,
}

impl Collector {
    fn check(&mut self, field: &str, ok: bool, message: &str) {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        }
    }

    fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Loose structural email check: `local@label.label...tld`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty()
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._'+-".contains(c))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn password_has_required_mix(password: &str) -> bool {
    let first_allowed = password
        .chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(&c))
        .unwrap_or(false);

    first_allowed
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut c = Collector::default();

        let name_len = self.full_name.chars().count();
        c.check("fullName", name_len >= 1, "Full name is required");
        c.check(
            "fullName",
            name_len >= 2,
            "Full name must be at least 2 characters long",
        );
        c.check(
            "fullName",
            name_len <= 50,
            "Full name must be less than 50 characters",
        );
        c.check(
            "fullName",
            name_len >= 1
                && self
                    .full_name
                    .chars()
                    .all(|ch| ch.is_ascii_alphabetic() || ch.is_whitespace()),
            "Full name can only contain letters and spaces",
        );

        let email_len = self.email.chars().count();
        c.check(
            "email",
            is_valid_email(&self.email),
            "Please enter a valid email address",
        );
        c.check("email", email_len >= 1, "Email is required");
        c.check(
            "email",
            email_len <= 255,
            "Email must be less than 255 characters",
        );

        let password_len = self.password.chars().count();
        c.check("password", password_len >= 1, "Password is required");
        c.check(
            "password",
            password_len >= 8,
            "Password must be at least 8 characters long",
        );
        c.check(
            "password",
            password_len <= 128,
            "Password must be less than 128 characters",
        );
        c.check(
            "password",
            password_has_required_mix(&self.password),
            "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
        );

        c.check(
            "confirmPassword",
            !self.confirm_password.is_empty(),
            "Please confirm your password",
        );

        // The match check only runs once every other rule passed.
        if c.errors.is_empty() {
            c.check(
                "confirmPassword",
                self.password == self.confirm_password,
                "Passwords don't match",
            );
        }

        c.finish()
    }
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut c = Collector::default();

        c.check(
            "email",
            is_valid_email(&self.email),
            "Please enter a valid email address",
        );
        c.check("email", !self.email.is_empty(), "Email is required");

        let password_len = self.password.chars().count();
        c.check("password", password_len >= 1, "Password is required");
        c.check(
            "password",
            password_len >= 6,
            "Password must be at least 6 characters long",
        );

        c.finish()
    }
}

impl RecipeForm {
    /// Trim list entries, drop blank ones, and check required fields.
    pub fn normalized(mut self) -> Result<RecipeForm, FieldErrors> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.cooking_time = self.cooking_time.trim().to_string();
        self.ingredients = clean_list(self.ingredients);
        self.steps = clean_list(self.steps);
        self.categories.sort();
        self.categories.dedup();

        let mut c = Collector::default();
        c.check("title", !self.title.is_empty(), "Title is required");
        c.check(
            "description",
            !self.description.is_empty(),
            "Description is required",
        );
        c.check(
            "cookingTime",
            !self.cooking_time.is_empty(),
            "Cooking time is required",
        );
        c.check("servings", self.servings >= 1, "Servings must be at least 1");
        c.check(
            "categories",
            !self.categories.is_empty(),
            "Please select at least one category.",
        );
        c.check(
            "ingredients",
            !self.ingredients.is_empty(),
            "Please add at least one ingredient.",
        );
        c.check(
            "steps",
            !self.steps.is_empty(),
            "Please add at least one instruction step.",
        );

        c.finish().map(|()| self)
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Difficulty};

    fn valid_signup() -> SignUpForm {
        SignUpForm {
            full_name: "Ada Cook".to_string(),
            email: "ada@example.com".to_string(),
            password: "Secret1!x".to_string(),
            confirm_password: "Secret1!x".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn test_empty_signup_reports_every_field() {
        let errors = SignUpForm::default().validate().unwrap_err();
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec!["confirmPassword", "email", "fullName", "password"]
        );
        assert_eq!(
            errors["email"],
            vec!["Please enter a valid email address", "Email is required"]
        );
        assert!(errors["fullName"].contains(&"Full name is required".to_string()));
    }

    #[test]
    fn test_full_name_rejects_digits() {
        let form = SignUpForm {
            full_name: "R2D2".to_string(),
            ..valid_signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors["fullName"],
            vec!["Full name can only contain letters and spaces"]
        );
    }

    #[test]
    fn test_password_needs_special_character() {
        let form = SignUpForm {
            password: "Secret12".to_string(),
            confirm_password: "Secret12".to_string(),
            ..valid_signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors["password"][0].starts_with("Password must contain"));
    }

    #[test]
    fn test_password_first_character_must_be_allowed() {
        let form = SignUpForm {
            password: "#Secret1!".to_string(),
            confirm_password: "#Secret1!".to_string(),
            ..valid_signup()
        };
        assert!(form.validate().unwrap_err().contains_key("password"));
    }

    #[test]
    fn test_mismatched_confirmation() {
        let form = SignUpForm {
            confirm_password: "Secret1!y".to_string(),
            ..valid_signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["confirmPassword"], vec!["Passwords don't match"]);
    }

    #[test]
    fn test_signin_short_password() {
        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: "abc".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors["password"],
            vec!["Password must be at least 6 characters long"]
        );
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("first.last+tag@mail.example.co"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a..b@example.com"));
        assert!(!is_valid_email("a@example.c"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn test_recipe_form_normalizes_lists() {
        let form = RecipeForm {
            title: "  Pad Thai ".to_string(),
            description: "Noodles".to_string(),
            difficulty: Difficulty::Medium,
            categories: vec![Category::Thai, Category::Dinner, Category::Thai],
            ingredients: vec![" rice noodles ".to_string(), "   ".to_string()],
            steps: vec!["Soak".to_string()],
            cooking_time: "30 minutes".to_string(),
            servings: 2,
        };
        let form = form.normalized().unwrap();
        assert_eq!(form.title, "Pad Thai");
        assert_eq!(form.ingredients, vec!["rice noodles"]);
        assert_eq!(form.categories, vec![Category::Thai, Category::Dinner]);
    }

    #[test]
    fn test_recipe_form_requires_lists() {
        let form = RecipeForm {
            title: "Toast".to_string(),
            description: "Bread".to_string(),
            difficulty: Difficulty::Easy,
            categories: vec![],
            ingredients: vec!["".to_string()],
            steps: vec![],
            cooking_time: "".to_string(),
            servings: 0,
        };
        let errors = form.normalized().unwrap_err();
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec!["categories", "cookingTime", "ingredients", "servings", "steps"]
        );
    }
}
