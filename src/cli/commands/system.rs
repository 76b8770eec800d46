use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, REGISTRY};
use crate::config::{Language, Settings};
use crate::currency::Currency;
use crate::domain::LedgerKind;

const SETTINGS_USAGE: &str = "settings [reset] [language UK|EN|RU] [currency UAH|USD|EUR]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "ledger",
            "Show or switch the active ledger",
            "ledger [income|expense]",
            cmd_ledger,
        ),
        CommandEntry::new(
            "settings",
            "Show, change or reset language and currency",
            SETTINGS_USAGE,
            cmd_settings,
        ),
        CommandEntry::new(
            "reload",
            "Re-read the active ledger from disk",
            "reload",
            cmd_reload,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match REGISTRY.resolve(name) {
            Some(entry) => {
                output::section(entry.name);
                output::info(entry.description);
                output::info(format!("usage: {}", entry.usage));
                if !entry.aliases.is_empty() {
                    output::info(format!("aliases: {}", entry.aliases.join(", ")));
                }
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Commands");
    for entry in REGISTRY.entries() {
        output::info(format!("  {:<16} {}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let kind: LedgerKind = raw.parse().map_err(CommandError::InvalidArguments)?;
        context.set_active(kind);
        output::success(format!("Switched to the {} ledger.", kind));
    } else {
        output::info(format!("Active ledger: {}", context.active_kind()));
    }
    Ok(())
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        let settings = context.settings();
        output::section("Settings");
        output::info(format!("  language : {}", settings.language));
        output::info(format!(
            "  currency : {} ({})",
            settings.currency,
            settings.currency.symbol()
        ));
        output::info(format!("  data dir : {}", context.data_dir().display()));
        return Ok(());
    }

    if args.len() == 1 && args[0].eq_ignore_ascii_case("reset") {
        context.reset_settings()?;
        output::success("Settings reset to defaults.");
        return Ok(());
    }
    if args.len() % 2 != 0 {
        return Err(CommandError::InvalidArguments(format!("usage: {}", SETTINGS_USAGE)));
    }
    let mut settings: Settings = context.settings();
    for pair in args.chunks(2) {
        match pair[0].to_lowercase().as_str() {
            "language" => {
                settings.language = pair[1]
                    .parse::<Language>()
                    .map_err(CommandError::InvalidArguments)?;
            }
            "currency" => {
                settings.currency = pair[1]
                    .parse::<Currency>()
                    .map_err(CommandError::InvalidArguments)?;
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown setting `{}`",
                    other
                )))
            }
        }
    }
    context.update_settings(settings)?;
    output::success(format!(
        "Settings saved: language {}, currency {}.",
        settings.language, settings.currency
    ));
    Ok(())
}

fn cmd_reload(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let count = context.ledger().with(|store| {
        store.reload();
        store.transactions().len()
    });
    output::success(format!("Reloaded {} transactions.", count));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
