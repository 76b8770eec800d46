use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "categories",
            "List categories with their totals",
            "categories",
            cmd_list,
        ),
        CommandEntry::new(
            "add-category",
            "Add a category to the active ledger",
            "add-category <name>",
            cmd_add,
        ),
        CommandEntry::new(
            "rename-category",
            "Rename a category and its transactions",
            "rename-category <old> <new>",
            cmd_rename,
        ),
        CommandEntry::new(
            "delete-category",
            "Delete a category and every transaction in it",
            "delete-category <name>",
            cmd_delete,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.ledger().snapshot();
    output::section(format!("{} categories", context.active_kind()));
    if snapshot.categories.is_empty() {
        output::warning("No categories defined.");
        return Ok(());
    }
    for (name, total) in snapshot.totals_in_order() {
        output::info(format!("  {:<20} {:>14}", name, context.money(total)));
    }
    output::info(format!("  {:<20} {:>14}", "Total", context.money(snapshot.total)));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-category <name>";
    require_args(args, 1, usage)?;
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    if context.ledger().with(|store| store.add_category(&name)) {
        output::success(format!("Category `{}` added.", name));
    } else {
        output::warning(format!("Category `{}` already exists.", name));
    }
    Ok(())
}

fn cmd_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "rename-category <old> <new>")?;
    let (old, new) = (args[0], args[1]);
    if new.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "the new category name cannot be blank".into(),
        ));
    }

    let known = context.ledger().with(|store| {
        if store.categories().iter().any(|name| name == old) {
            store.rename_category(old, new);
            true
        } else {
            false
        }
    });
    if known {
        output::success(format!("Category `{}` renamed to `{}`.", old, new));
    } else {
        output::warning(format!("Category `{}` does not exist.", old));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "delete-category <name>")?;
    let name = args.join(" ");

    let exists = context
        .ledger()
        .with(|store| store.categories().iter().any(|entry| *entry == name));
    if !exists {
        output::warning(format!("Category `{}` does not exist.", name));
        return Ok(());
    }

    let prompt = format!("Delete `{}` and all of its transactions?", name);
    if !context.confirm(&prompt)? {
        output::info("Nothing deleted.");
        return Ok(());
    }

    let removed = context.ledger().with(|store| store.delete_category(&name));
    output::success(format!(
        "Category `{}` deleted ({} transactions removed).",
        name, removed
    ));
    Ok(())
}
