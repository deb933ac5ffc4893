use crate::builders::checker;
use crate::core::config::FixerConfig;

/// The `ConfigValidator` trait defines the interface for validating a
/// `FixerConfig` before any file is touched.
pub trait ConfigValidator {
    /// Performs a full validation of the configuration.
    ///
    /// # Arguments
    /// * `config`: The merged configuration (file plus CLI overrides).
    ///
    /// # Returns
    /// A `Vec<String>` of human-readable issues. An empty list means the
    /// configuration is usable.
    fn validate_config(&self, config: &FixerConfig) -> Vec<String>;

    /// Validates only the encoding name that ends up in declarations.
    ///
    /// # Arguments
    /// * `coding`: The encoding name, e.g. `"UTF-8"`.
    ///
    /// # Returns
    /// A `Vec<String>` of issues with the name or the declaration line it
    /// produces.
    fn validate_coding(&self, coding: &str) -> Vec<String>;
}

/// The `StandardValidator` is the validator used by `ConfigManager`.
///
/// Beyond basic well-formedness it guarantees that the declaration line a
/// configuration produces is itself recognized by the checker. Without that,
/// every pass would insert another declaration into the same file.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    fn check_name_component(&self, field: &str, value: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if value.is_empty() {
            issues.push(format!("{field} must not be empty"));
        }
        if value.contains(['/', '\\']) {
            issues.push(format!("{field} must not contain path separators: {value:?}"));
        }
        issues
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &FixerConfig) -> Vec<String> {
        let mut issues = self.validate_coding(&config.coding);

        issues.extend(self.check_name_component("extension", &config.extension));
        if config.extension.starts_with('.') {
            issues.push(format!(
                "extension is given without the leading dot: {:?}",
                config.extension
            ));
        }

        issues.extend(self.check_name_component("excluded_dir", &config.excluded_dir));
        issues.extend(self.check_name_component("backup_suffix", &config.backup_suffix));

        issues
    }

    fn validate_coding(&self, coding: &str) -> Vec<String> {
        let mut issues = Vec::new();

        if coding.is_empty() {
            issues.push("coding must not be empty".to_string());
            return issues;
        }
        if coding.chars().any(char::is_whitespace) {
            issues.push(format!("coding must not contain whitespace: {coding:?}"));
        }
        if coding.contains("-*-") {
            issues.push(format!("coding must not contain the '-*-' marker: {coding:?}"));
        }

        let declaration = format!("# -*- coding: {coding} -*-");
        if !checker::is_declaration(declaration.as_bytes()) {
            issues.push(format!(
                "coding {coding:?} would produce a declaration that is not recognized \
                 (expected a name like 'utf-8' or 'latin-1')"
            ));
        }

        issues
    }
}
