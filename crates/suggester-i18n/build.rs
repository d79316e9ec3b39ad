//! Build script for suggester-i18n
//!
//! Validates every `locales/<tag>/main.ftl` file at compile time:
//! - Fluent syntax parses cleanly
//! - Every locale carries the same message keys
//! - Every translation uses the same variables as the reference locale
//!
//! It then writes `bundled_locales.rs` into `OUT_DIR`, embedding each file
//! with `include_str!` so the catalog needs no runtime file access.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use fluent_syntax::ast::{Entry, Expression, InlineExpression, Pattern, PatternElement};
use fluent_syntax::parser::parse;

/// Locale every other locale is compared against.
const REFERENCE_LOCALE: &str = "en-US";

type MessageParams = BTreeMap<String, BTreeSet<String>>;

/// Extract message keys and their variables from a Fluent file
fn extract_messages_and_params(content: &str) -> Result<MessageParams, String> {
    let resource = parse(content).map_err(|(_, errors)| format!("Parse errors: {errors:?}"))?;

    let mut messages = BTreeMap::new();

    for entry in resource.body {
        if let Entry::Message(message) = entry {
            let key = message.id.name.to_string();
            let mut params = BTreeSet::new();

            if let Some(Pattern { elements }) = message.value {
                extract_params_from_pattern(&elements, &mut params);
            }

            for attribute in message.attributes {
                let Pattern { elements } = attribute.value;
                extract_params_from_pattern(&elements, &mut params);
            }

            if messages.insert(key.clone(), params).is_some() {
                return Err(format!("Duplicate message key '{key}'"));
            }
        }
    }

    Ok(messages)
}

fn extract_params_from_pattern<S>(elements: &[PatternElement<S>], params: &mut BTreeSet<String>)
where
    S: AsRef<str> + ToString,
{
    for element in elements {
        if let PatternElement::Placeable { expression } = element {
            extract_params_from_expression(expression, params);
        }
    }
}

fn extract_params_from_expression<S>(expression: &Expression<S>, params: &mut BTreeSet<String>)
where
    S: AsRef<str> + ToString,
{
    match expression {
        Expression::Select { selector, variants } => {
            extract_params_from_inline_expression(selector, params);
            for variant in variants {
                let Pattern { elements } = &variant.value;
                extract_params_from_pattern(elements, params);
            }
        }
        Expression::Inline(inline) => extract_params_from_inline_expression(inline, params),
    }
}

fn extract_params_from_inline_expression<S>(
    expression: &InlineExpression<S>,
    params: &mut BTreeSet<String>,
) where
    S: AsRef<str> + ToString,
{
    match expression {
        InlineExpression::VariableReference { id } => {
            params.insert(id.name.to_string());
        }
        InlineExpression::FunctionReference { arguments, .. } => {
            for arg in &arguments.positional {
                extract_params_from_inline_expression(arg, params);
            }
            for arg in &arguments.named {
                extract_params_from_inline_expression(&arg.value, params);
            }
        }
        InlineExpression::Placeable { expression } => {
            extract_params_from_expression(expression, params);
        }
        InlineExpression::MessageReference { .. }
        | InlineExpression::TermReference { .. }
        | InlineExpression::StringLiteral { .. }
        | InlineExpression::NumberLiteral { .. } => {}
    }
}

/// Find all `locales/<tag>/main.ftl` files, keyed by tag
fn find_locale_files(locales_dir: &Path) -> Result<BTreeMap<String, PathBuf>, String> {
    if !locales_dir.exists() {
        return Err(format!(
            "Locales directory not found: {}",
            locales_dir.display()
        ));
    }

    let mut locale_files = BTreeMap::new();

    for entry in fs::read_dir(locales_dir)
        .map_err(|e| format!("Failed to read locales directory: {e}"))?
    {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {e}"))?;
        let path = entry.path();

        if path.is_dir() {
            let locale_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| format!("Invalid locale directory name: {}", path.display()))?;

            let main_ftl = path.join("main.ftl");
            if main_ftl.exists() {
                locale_files.insert(locale_name.to_string(), main_ftl);
            }
        }
    }

    if locale_files.is_empty() {
        return Err("No locale files found".to_string());
    }

    Ok(locale_files)
}

fn check_consistency(all_messages: &BTreeMap<String, MessageParams>) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(reference) = all_messages.get(REFERENCE_LOCALE) else {
        errors.push(format!("Reference locale '{REFERENCE_LOCALE}' is missing"));
        return errors;
    };

    for (locale, messages) in all_messages {
        if locale == REFERENCE_LOCALE {
            continue;
        }

        for key in reference.keys().filter(|key| !messages.contains_key(*key)) {
            errors.push(format!("{locale}: Missing message key '{key}'"));
        }

        for key in messages.keys().filter(|key| !reference.contains_key(*key)) {
            errors.push(format!("{locale}: Extra message key '{key}'"));
        }

        for (key, ref_params) in reference {
            if let Some(locale_params) = messages.get(key) {
                if ref_params != locale_params {
                    errors.push(format!(
                        "{locale}: Parameter mismatch for '{key}'. Expected: {ref_params:?}, Found: {locale_params:?}"
                    ));
                }
            }
        }
    }

    errors
}

fn write_bundled_table(locale_files: &BTreeMap<String, PathBuf>) -> Result<(), String> {
    let out_dir = env::var("OUT_DIR").map_err(|_| "OUT_DIR not set")?;
    let mut table = String::from("/// Locale tag and Fluent source for every bundled locale.\n");
    table.push_str("pub static BUNDLED_LOCALES: &[(&str, &str)] = &[\n");
    for (locale, path) in locale_files {
        table.push_str(&format!(
            "    ({locale:?}, include_str!({:?})),\n",
            path.display().to_string()
        ));
    }
    table.push_str("];\n");

    fs::write(Path::new(&out_dir).join("bundled_locales.rs"), table)
        .map_err(|e| format!("Failed to write bundled locale table: {e}"))
}

fn validate_locales() -> Result<(), String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| "CARGO_MANIFEST_DIR not set")?;
    let locales_dir = Path::new(&manifest_dir).join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let locale_files = find_locale_files(&locales_dir)?;

    let mut all_messages = BTreeMap::new();
    let mut validation_errors = Vec::new();

    for (locale, path) in &locale_files {
        println!("cargo:rerun-if-changed={}", path.display());
        let parsed = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))
            .and_then(|content| extract_messages_and_params(&content));
        match parsed {
            Ok(messages) => {
                all_messages.insert(locale.clone(), messages);
            }
            Err(e) => validation_errors.push(format!("{locale}: {e}")),
        }
    }

    if !validation_errors.is_empty() {
        return Err(format!(
            "Validation errors:\n{}",
            validation_errors.join("\n")
        ));
    }

    let consistency_errors = check_consistency(&all_messages);
    if !consistency_errors.is_empty() {
        return Err(format!(
            "Consistency errors:\n{}",
            consistency_errors.join("\n")
        ));
    }

    write_bundled_table(&locale_files)
}

fn main() {
    if let Err(e) = validate_locales() {
        eprintln!("Locale validation failed:\n{e}");
        process::exit(1);
    }
}
