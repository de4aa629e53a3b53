//! Schema introspection commands.
//!
//! `scriptwright verbs` - List verbs available at the root or under a parent verb.
//! `scriptwright describe` - Show the form fields of one verb.

use anyhow::{anyhow, Result};
use scriptwright_schema::{form_fields, verb_of, FieldKind, FormField, SchemaResolver};

/// Verbs that can be added at the root, or under `parent`.
///
/// `parent` is matched the way verb lookups are, so its spelling need not be
/// exact; sub-verbs are listed under the declared spelling.
pub fn verbs(resolver: &SchemaResolver, parent: Option<&str>) -> Result<Vec<String>> {
    match parent {
        None => Ok(resolver.available_verbs()?),
        Some(parent) => {
            let fragment = resolver
                .action_schema(parent)?
                .ok_or_else(|| anyhow!("Unknown verb '{}'", parent))?;
            let canonical = verb_of(&fragment)?;
            Ok(resolver.available_sub_verbs(&canonical)?)
        }
    }
}

/// Form fields of `verb` (a sub-action of `parent` when given).
pub fn describe(
    resolver: &SchemaResolver,
    verb: &str,
    parent: Option<&str>,
) -> Result<Vec<FormField>> {
    let fragment = match parent {
        None => resolver.action_schema(verb)?,
        Some(parent) => resolver.sub_action_schema(parent, verb)?,
    };

    match fragment {
        Some(fragment) => Ok(form_fields(&fragment)),
        None => match parent {
            Some(parent) => anyhow::bail!("'{}' is not a sub-action of '{}'", verb, parent),
            None => anyhow::bail!("Unknown verb '{}'", verb),
        },
    }
}

pub fn print_verbs(verbs: &[String], parent: Option<&str>) {
    match parent {
        Some(parent) => println!("\nSub-actions of {} ({}):", parent, verbs.len()),
        None => println!("\nActions ({}):", verbs.len()),
    }
    for verb in verbs {
        println!("   {}", verb);
    }
}

pub fn print_fields(verb: &str, fields: &[FormField]) {
    println!("\n{}", verb);
    for field in fields {
        let kind = match field.kind {
            FieldKind::Choice => "choice",
            FieldKind::Toggle => "toggle",
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::Collection => "collection",
        };

        let mut badges = Vec::new();
        if field.required {
            badges.push("required");
        }
        if field.read_only {
            badges.push("read-only");
        }

        print!("   {:<24} {:<10}", field.name, kind);
        if !badges.is_empty() {
            print!(" [{}]", badges.join(", "));
        }
        if !field.choices.is_empty() {
            let choices: Vec<String> = field.choices.iter().map(|c| c.to_string()).collect();
            print!(" {}", choices.join(" | "));
        }
        println!();
    }
}
