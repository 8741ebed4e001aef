//! Command line front end

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::info;

use crate::capture;
use crate::config::{Backend, Config};
use crate::gateway::{AgentControl, Gateway, ProfileStore};
use crate::logs::{self, LogBuffer};
use crate::macros::{
    ActionSlot, Combinator, ConditionRule, ConditionSet, CreateOutcome, KeyCombo, PresetCatalog, PresetId,
    parse_millis,
};
use crate::session::{Notice, PresetEditor, ProfileEditor};

#[derive(Parser, Debug)]
#[command(name = "macros-manager", version, about = "Configure and drive the input macro agent")]
pub struct Args {
    /// Where profiles and presets are read and written
    #[arg(long, value_enum, global = true, default_value_t = Backend::Http)]
    pub backend: Backend,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stored profiles
    Profiles,
    /// Show a profile and the presets it references
    Profile { name: String },
    /// Create an empty profile
    NewProfile { name: String },
    /// List stored presets
    Presets,
    /// Create a preset unless one with that name exists
    NewPreset {
        #[arg(long)]
        name: Option<String>,
    },
    /// Reference a preset from a profile
    Attach { profile: String, preset: PresetId },
    /// Remove a preset reference from a profile
    Detach { profile: String, preset: PresetId },
    /// Flip a referenced preset between active and inactive
    Toggle { profile: String, preset: PresetId },
    /// Edit one action slot of a preset
    Slot(SlotArgs),
    /// Record a key binding from the keyboard
    Capture {
        /// Seconds to wait for a key press
        #[arg(long, default_value = "10")]
        timeout: u64,
    },
    /// Start the macro loop of a profile for a game process
    Start {
        profile: String,
        #[arg(long)]
        pid: u32,
    },
    /// Stop the macro loop of a game process
    Stop {
        #[arg(long)]
        pid: u32,
    },
    /// Pause or resume the macro loop of a game process
    Pause {
        #[arg(long)]
        pid: u32,
    },
    /// Show game processes and running loops
    Status,
    /// Follow the agent's log stream
    Logs {
        /// `host:port` overriding `logs.address`
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct SlotArgs {
    pub preset: PresetId,
    pub index: usize,

    /// Verb such as `/attack`; empty clears it
    #[arg(long)]
    pub action: Option<String>,

    /// Binding such as `ctrl+1`; empty clears it
    #[arg(long)]
    pub binding: Option<String>,

    /// Milliseconds; empty means unset
    #[arg(long)]
    pub delay: Option<String>,

    /// Milliseconds; empty means unset
    #[arg(long)]
    pub period: Option<String>,

    #[arg(long)]
    pub additional: Option<String>,

    /// Rule such as `target_hp<30`; repeat to replace all conditions
    #[arg(long = "condition")]
    pub conditions: Vec<ConditionRule>,

    /// `AND` or `OR`, applied across all conditions
    #[arg(long)]
    pub combinator: Option<Combinator>,

    /// Remove all conditions
    #[arg(long, conflicts_with = "conditions")]
    pub clear_conditions: bool,
}

impl SlotArgs {
    /// Apply the given options to a slot, leaving the rest untouched
    pub fn apply(&self, slot: &mut ActionSlot) -> Result<()> {
        if let Some(action) = &self.action {
            slot.action = match action.trim() {
                "" => None,
                verb => Some(verb.parse()?),
            };
        }
        if let Some(binding) = &self.binding {
            slot.binding = binding.parse::<KeyCombo>()?;
        }
        if let Some(delay) = &self.delay {
            slot.delay_ms = parse_millis(delay)?;
        }
        if let Some(period) = &self.period {
            slot.period_ms = parse_millis(period)?;
        }
        if let Some(additional) = &self.additional {
            slot.additional = additional.clone();
        }

        if self.clear_conditions {
            slot.condition = ConditionSet::new();
        } else if !self.conditions.is_empty() {
            let mut condition = ConditionSet::new();
            for rule in &self.conditions {
                condition.push_rule(rule.clone());
            }
            slot.condition = condition;
        }
        if let Some(combinator) = self.combinator {
            slot.condition.set_combinator(combinator)?;
        }
        Ok(())
    }
}

pub async fn run(args: Args, config: Config) -> Result<()> {
    let gateway = Gateway::from_config(&config, args.backend)?;
    let slot_count = config.editor.slot_count;

    match args.command {
        Commands::Profiles => {
            for profile in gateway.list_profiles().await? {
                println!("{} ({} presets)", profile.name, profile.items.len());
            }
        }
        Commands::Profile { name } => {
            let mut editor = ProfileEditor::new(&name, slot_count)?;
            report(editor.load(&gateway, &name).await?)?;
            print_profile(&editor);
        }
        Commands::NewProfile { name } => {
            let mut editor = ProfileEditor::new(&name, slot_count)?;
            if gateway.get_profile(editor.profile().name()).await?.is_some() {
                bail!("Profile {} already exists", editor.profile().name());
            }
            report(editor.save(&gateway).await)?;
        }
        Commands::Presets => {
            let mut catalog = PresetCatalog::new(slot_count);
            catalog.load(&gateway.list_presets().await?);
            for preset in catalog.iter() {
                println!("{}  {} ({} slots used)", preset.id, preset.name, preset.items.used());
            }
        }
        Commands::NewPreset { name } => {
            let mut catalog = PresetCatalog::new(slot_count);
            catalog.load(&gateway.list_presets().await?);
            match catalog.create_preset(name.as_deref()) {
                CreateOutcome::Existing(id) => println!("Preset already exists: {id}"),
                CreateOutcome::Created(id) => {
                    let preset = catalog.get(id).context("created preset missing from catalog")?;
                    report(PresetEditor::new(preset.clone()).save(&gateway).await)?;
                    println!("{id}");
                }
            }
        }
        Commands::Attach { profile, preset } => {
            let mut editor = load_profile(&gateway, &profile, slot_count).await?;
            editor.attach(preset)?;
            report(editor.save(&gateway).await)?;
        }
        Commands::Detach { profile, preset } => {
            let mut editor = load_profile(&gateway, &profile, slot_count).await?;
            editor.detach(preset)?;
            report(editor.save(&gateway).await)?;
        }
        Commands::Toggle { profile, preset } => {
            let mut editor = load_profile(&gateway, &profile, slot_count).await?;
            let active = editor.toggle(preset)?;
            report(editor.save(&gateway).await)?;
            println!("{preset}: {}", if active { "active" } else { "inactive" });
        }
        Commands::Slot(slot_args) => {
            let mut catalog = PresetCatalog::new(slot_count);
            catalog.load(&gateway.list_presets().await?);
            let preset = catalog
                .get(slot_args.preset)
                .with_context(|| format!("Unknown preset {}", slot_args.preset))?;

            let mut editor = PresetEditor::new(preset.clone());
            slot_args.apply(editor.slot_mut(slot_args.index)?)?;
            if editor.is_dirty() {
                report(editor.save(&gateway).await)?;
            }
            println!("{}", describe_slot(slot_args.index, editor.preset().items.slot(slot_args.index)?));
        }
        Commands::Capture { timeout } => {
            if !capture::check_permissions() {
                capture::print_permission_error();
                bail!("Cannot read input devices");
            }
            let combo =
                tokio::task::spawn_blocking(move || capture::capture_binding(Duration::from_secs(timeout))).await??;
            println!("{combo}");
        }
        Commands::Start { profile, pid } => {
            gateway.start(&profile, pid).await?;
            println!("Started {profile} for pid {pid}");
        }
        Commands::Stop { pid } => {
            gateway.stop(pid).await?;
            println!("Stopped pid {pid}");
        }
        Commands::Pause { pid } => {
            gateway.pause(pid).await?;
            println!("Toggled pause for pid {pid}");
        }
        Commands::Status => {
            let init = gateway.init().await?;
            for (pid, title) in &init.pids_data {
                let state = if init.is_running(*pid) { "running" } else { "idle" };
                println!("{pid}  {state:<8}{title}");
            }
            println!("Profiles: {}", init.profiles_list.join(", "));
        }
        Commands::Logs { address } => {
            let address = address.unwrap_or(config.logs.address);
            let stream = TcpStream::connect(&address)
                .await
                .with_context(|| format!("Failed to connect to log stream at {address}"))?;
            info!(%address, "Following agent log stream");

            let mut history = LogBuffer::new(config.logs.history_limit);
            logs::follow(BufReader::new(stream), &mut history, |batch| {
                for line in batch {
                    println!("{line}");
                }
            })
            .await?;
        }
    }
    Ok(())
}

async fn load_profile(gateway: &Gateway, name: &str, slot_count: usize) -> Result<ProfileEditor> {
    let mut editor = ProfileEditor::new(name, slot_count)?;
    report(editor.load(gateway, name).await?)?;
    Ok(editor)
}

/// Print a success notice; turn an alert into an error
fn report(notice: Notice) -> Result<()> {
    if !notice.is_success() {
        bail!(notice.message);
    }
    info!(message = %notice.message, "Done");
    Ok(())
}

fn print_profile(editor: &ProfileEditor) {
    println!("{}", editor.profile().name());
    for (preset, is_active) in editor.profile().resolve(editor.catalog()) {
        let marker = if is_active { '*' } else { ' ' };
        println!(" {marker} {}  {}", preset.id, preset.name);
        for (index, slot) in preset.items.slots().iter().enumerate().filter(|(_, s)| !s.is_blank()) {
            println!("      {}", describe_slot(index, slot));
        }
    }
}

fn describe_slot(index: usize, slot: &ActionSlot) -> String {
    let action = slot.action.map(|a| a.as_str()).unwrap_or("-");
    let binding = if slot.binding.is_empty() { "-" } else { slot.binding.as_str() };
    let mut line = format!(
        "#{index:<2} {action:<18} {binding:<12} delay={} period={}",
        slot.delay_ms, slot.period_ms
    );
    if !slot.additional.is_empty() {
        line.push_str(&format!(" [{}]", slot.additional));
    }
    if !slot.condition.is_empty() {
        line.push_str(&format!(" if {}", slot.condition));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::{ActionVerb, FieldName, Operator};

    #[test]
    fn test_parse_slot_command() {
        let args = Args::try_parse_from([
            "macros-manager",
            "--backend",
            "file",
            "slot",
            "1718000000000",
            "3",
            "--action",
            "/attack",
            "--binding",
            "Shift+Ctrl+F1",
            "--delay",
            "",
            "--condition",
            "target_hp<30",
            "--condition",
            "my_mp>10",
            "--combinator",
            "or",
        ])
        .unwrap();

        assert_eq!(args.backend, Backend::File);
        let Commands::Slot(slot_args) = args.command else {
            panic!("expected slot command");
        };
        assert_eq!(slot_args.preset, PresetId(1718000000000));

        let mut slot = ActionSlot { delay_ms: 500, ..ActionSlot::default() };
        slot_args.apply(&mut slot).unwrap();
        assert_eq!(slot.action, Some(ActionVerb::Attack));
        assert_eq!(slot.binding.as_str(), "ctrl+shift+f1");
        assert_eq!(slot.delay_ms, 0);
        assert_eq!(slot.condition.len(), 2);
        assert_eq!(slot.condition.combinator(), Some(Combinator::Or));
    }

    #[test]
    fn test_slot_rejects_bad_input() {
        assert!(Args::try_parse_from(["macros-manager", "slot", "1", "0", "--condition", "hp<<3"]).is_err());

        let args = SlotArgs { delay: Some("-5".to_string()), ..SlotArgs::default() };
        assert!(args.apply(&mut ActionSlot::default()).is_err());

        let args = SlotArgs { combinator: Some(Combinator::And), ..SlotArgs::default() };
        assert!(args.apply(&mut ActionSlot::default()).is_err());
    }

    #[test]
    fn test_clear_conditions() {
        let mut slot = ActionSlot::default();
        slot.condition.push_rule(ConditionRule::new(FieldName::TargetHp, Operator::LessThan, 30.0));
        let args = SlotArgs { clear_conditions: true, ..SlotArgs::default() };
        args.apply(&mut slot).unwrap();
        assert!(slot.condition.is_empty());
    }

    #[test]
    fn test_describe_slot() {
        let mut slot = ActionSlot {
            action: Some(ActionVerb::UseSkill),
            binding: "f2".parse().unwrap(),
            period_ms: 3000,
            additional: "Heal".to_string(),
            ..ActionSlot::default()
        };
        slot.condition.push_rule(ConditionRule::new(FieldName::MyHp, Operator::LessThan, 50.0));
        let line = describe_slot(4, &slot);
        assert!(line.starts_with("#4  /useskill"));
        assert!(line.contains("period=3000"));
        assert!(line.contains("[Heal]"));
        assert!(line.contains("if my_hp<50"));
    }

    #[test]
    fn test_default_backend_is_http() {
        let args = Args::try_parse_from(["macros-manager", "status"]).unwrap();
        assert_eq!(args.backend, Backend::Http);
        assert!(matches!(args.command, Commands::Status));
    }
}
