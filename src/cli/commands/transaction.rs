use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::dates;
use crate::domain::{Displayable, SortKey, Transaction, TransactionDraft};

use super::{comment_from, parse_amount, parse_date, require_args};

const ADD_USAGE: &str = "add <amount> <category> <date> [comment...]";
const EDIT_USAGE: &str = "edit <id> <amount> <category> <date> [comment...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a transaction", ADD_USAGE, cmd_add),
        CommandEntry::new("edit", "Replace a transaction by id", EDIT_USAGE, cmd_edit),
        CommandEntry::new("remove", "Delete a transaction by id", "remove <id>", cmd_remove),
        CommandEntry::new(
            "list",
            "List transactions in the chosen order",
            "list [date|amount|category]",
            cmd_list,
        ),
        CommandEntry::new(
            "filter",
            "List the transactions of one category",
            "filter <category>",
            cmd_filter,
        ),
        CommandEntry::new(
            "range",
            "List transactions between two dates (inclusive)",
            "range <start> <end> [category]",
            cmd_range,
        ),
        CommandEntry::new(
            "totals",
            "Show the ledger total",
            "totals",
            cmd_totals,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 3, ADD_USAGE)?;
    let amount = parse_amount(args[0])?;
    let category = args[1];
    let date = parse_date(args[2])?;
    ensure_category(context, category)?;

    let mut draft = TransactionDraft::new(category, amount, dates::format_canonical(date));
    if let Some(comment) = comment_from(&args[3..]) {
        draft = draft.with_comments(comment);
    }
    match context.ledger().with(|store| store.add_transaction(draft)) {
        Some(id) => output::success(format!("Added transaction {}.", id)),
        None => output::warning("Transaction rejected."),
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 4, EDIT_USAGE)?;
    let id = args[0];
    let amount = parse_amount(args[1])?;
    let category = args[2];
    let date = parse_date(args[3])?;
    ensure_category(context, category)?;

    let updated = Transaction {
        id: id.to_string(),
        category: category.to_string(),
        amount,
        date: dates::format_canonical(date),
        comments: comment_from(&args[4..]),
    };
    if context.ledger().with(|store| store.update_transaction(updated)) {
        output::success(format!("Updated transaction {}.", id));
    } else {
        output::warning(format!("No transaction with id `{}`.", id));
    }
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "remove <id>")?;
    let id = args[0];
    let removed = context.ledger().with(|store| {
        let target = store.snapshot().transaction(id).cloned()?;
        store.delete_transaction(&target).then_some(target)
    });
    match removed {
        Some(txn) => output::success(format!("Removed {}.", txn.display_label())),
        None => output::warning(format!("No transaction with id `{}`.", id)),
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let rows = match args.first() {
        Some(raw) => {
            let key: SortKey = raw.parse().map_err(CommandError::InvalidArguments)?;
            context.ledger().with(|store| store.sort_by(key).to_vec())
        }
        None => context
            .ledger()
            .with(|store| store.sorted_transactions().to_vec()),
    };
    print_rows(context, &format!("{} transactions", context.active_kind()), &rows);
    Ok(())
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "filter <category>")?;
    let category = args.join(" ");
    let rows = context
        .ledger()
        .with(|store| store.filter_by_category(&category));
    print_rows(context, &format!("Category `{}`", category), &rows);
    Ok(())
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "range <start> <end> [category]")?;
    let start = parse_date(args[0])?;
    let end = parse_date(args[1])?;
    let category = args.get(2).copied();
    let rows = context
        .ledger()
        .with(|store| store.filter_by_date_range(start, end, category));
    let title = format!(
        "{} to {}",
        dates::format_display(start),
        dates::format_display(end)
    );
    print_rows(context, &title, &rows);
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let (total, count) = context
        .ledger()
        .with(|store| (store.total(), store.transactions().len()));
    output::info(format!(
        "{} total: {} across {} transactions.",
        context.active_kind(),
        context.money(total),
        count
    ));
    Ok(())
}

fn ensure_category(context: &ShellContext, category: &str) -> CommandResult {
    let known = context
        .ledger()
        .with(|store| store.categories().iter().any(|name| name == category));
    if known {
        Ok(())
    } else {
        output::hint(format!("Create it first with `add-category {}`.", category));
        Err(CommandError::InvalidArguments(format!(
            "unknown category `{}`",
            category
        )))
    }
}

fn print_rows(context: &ShellContext, title: &str, rows: &[Transaction]) {
    output::section(title);
    if rows.is_empty() {
        output::warning("No transactions recorded.");
        return;
    }
    for txn in rows {
        let date = dates::to_display(&txn.date).unwrap_or_else(|_| txn.date.clone());
        let mut line = format!(
            "  {}  {:<10} {:<18} {:>14}",
            txn.id,
            date,
            txn.category,
            context.money(txn.amount)
        );
        if let Some(comment) = &txn.comments {
            line.push_str("  ");
            line.push_str(comment);
        }
        output::info(line);
    }
}
