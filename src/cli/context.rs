//! Shell state, dispatch, and shared helpers used by command handlers.

use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::config::{Settings, SettingsManager, SETTINGS_NAMESPACE};
use crate::currency::{format_money, Currency};
use crate::domain::LedgerKind;
use crate::ledger::{LedgerStore, SharedLedgerStore};
use crate::storage::JsonStorage;

use super::error::{CliError, CommandError, CommandResult};
use super::output;
use super::registry::REGISTRY;
use super::shell::parse_command_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    active: LedgerKind,
    income: SharedLedgerStore,
    expense: SharedLedgerStore,
    settings_manager: SettingsManager,
    settings: Settings,
    storage: JsonStorage,
}

impl ShellContext {
    /// Opens both ledgers and the settings under the default data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_root(mode, None)
    }

    pub fn with_root(mode: CliMode, root: Option<PathBuf>) -> Result<Self, CliError> {
        let storage = JsonStorage::new(root)?;
        let income = open_ledger(&storage, LedgerKind::Income)?;
        let expense = open_ledger(&storage, LedgerKind::Expense)?;
        let settings_manager = SettingsManager::new(storage.open(SETTINGS_NAMESPACE)?);
        let settings = settings_manager.load()?;
        tracing::info!(root = %storage.base_dir().display(), "shell context ready");
        Ok(Self {
            mode,
            running: true,
            active: LedgerKind::Income,
            income,
            expense,
            settings_manager,
            settings,
            storage,
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn active_kind(&self) -> LedgerKind {
        self.active
    }

    pub fn set_active(&mut self, kind: LedgerKind) {
        self.active = kind;
    }

    /// Handle to the ledger currently selected with `ledger`.
    pub fn ledger(&self) -> &SharedLedgerStore {
        self.ledger_for(self.active)
    }

    pub fn ledger_for(&self, kind: LedgerKind) -> &SharedLedgerStore {
        match kind {
            LedgerKind::Income => &self.income,
            LedgerKind::Expense => &self.expense,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) -> CommandResult {
        self.settings_manager.save(&settings)?;
        self.settings = settings;
        Ok(())
    }

    pub fn reset_settings(&mut self) -> CommandResult {
        self.settings = self.settings_manager.reset()?;
        Ok(())
    }

    pub fn currency(&self) -> Currency {
        self.settings.currency
    }

    pub fn money(&self, value: f64) -> String {
        format_money(value, self.settings.currency)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.base_dir().to_path_buf()
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.active.to_string().to_lowercase())
    }

    /// Parses and runs one shell line.
    pub fn execute(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(entry) = REGISTRY.resolve(command) {
            match (entry.handler)(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = REGISTRY
            .words()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    /// Asks for confirmation interactively; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(self.confirm("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

fn open_ledger(storage: &JsonStorage, kind: LedgerKind) -> Result<SharedLedgerStore, CliError> {
    let namespace = storage.open(kind.namespace())?;
    let notifier = move || {
        tracing::debug!(ledger = %kind, "ledger updated");
    };
    Ok(SharedLedgerStore::new(LedgerStore::open(kind, namespace, notifier)))
}
