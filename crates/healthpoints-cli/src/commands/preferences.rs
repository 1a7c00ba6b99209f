//! `prefs` subcommands for per-user preferences.

use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;

use healthpoints_models::Preferences;
use healthpoints_store::sessions::EditMode;

use crate::client::{AppContext, CliResult};
use crate::commands::{
    IdArg, ListArgs, SearchArgs, push_field, run_delete, run_get, run_list, run_submit,
};
use crate::output::OutputFormat;

const COLUMNS: &[&str] = &["id", "weeklyGoal", "weightUnits", "user"];

#[derive(Subcommand)]
pub(crate) enum PreferencesCommand {
    /// List preference records.
    List(ListArgs),
    /// Search preference records.
    Search(SearchArgs),
    /// Show one preference record.
    Get(IdArg),
    /// Create a preference record.
    Create(PreferencesFields),
    /// Update an existing preference record.
    Update(PreferencesUpdateArgs),
    /// Delete a preference record.
    Delete(IdArg),
}

impl PreferencesCommand {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::List(_) => "prefs_list",
            Self::Search(_) => "prefs_search",
            Self::Get(_) => "prefs_get",
            Self::Create(_) => "prefs_create",
            Self::Update(_) => "prefs_update",
            Self::Delete(_) => "prefs_delete",
        }
    }
}

/// Weight unit accepted on the command line, uppercased on the wire.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum UnitsArg {
    Kg,
    Lb,
}

impl UnitsArg {
    const fn as_wire(self) -> &'static str {
        match self {
            Self::Kg => "KG",
            Self::Lb => "LB",
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct PreferencesFields {
    #[arg(long, help = "Weekly points goal, between 10 and 21")]
    pub(crate) weekly_goal: Option<i32>,
    #[arg(long, value_enum, help = "Unit weights are recorded in")]
    pub(crate) weight_units: Option<UnitsArg>,
    #[arg(long, help = "Owning user identifier")]
    pub(crate) user: Option<i64>,
}

impl PreferencesFields {
    fn into_values(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "weeklyGoal", self.weekly_goal);
        push_field(
            &mut fields,
            "weightUnits",
            self.weight_units.map(UnitsArg::as_wire),
        );
        push_field(&mut fields, "user", self.user);
        fields
    }
}

#[derive(Args)]
pub(crate) struct PreferencesUpdateArgs {
    #[command(flatten)]
    pub(crate) id: IdArg,
    #[command(flatten)]
    pub(crate) fields: PreferencesFields,
}

pub(crate) async fn dispatch(
    ctx: &AppContext,
    command: PreferencesCommand,
    output: OutputFormat,
) -> CliResult<()> {
    match command {
        PreferencesCommand::List(args) => {
            run_list::<Preferences>(ctx, &args, None, output, COLUMNS).await
        }
        PreferencesCommand::Search(args) => {
            run_list::<Preferences>(ctx, &args.list, Some(&args.query), output, COLUMNS).await
        }
        PreferencesCommand::Get(arg) => run_get::<Preferences>(ctx, arg.id, output).await,
        PreferencesCommand::Create(fields) => {
            run_submit::<Preferences>(ctx, EditMode::Create, fields.into_values(), output).await
        }
        PreferencesCommand::Update(args) => {
            run_submit::<Preferences>(
                ctx,
                EditMode::Edit(args.id.id),
                args.fields.into_values(),
                output,
            )
            .await
        }
        PreferencesCommand::Delete(arg) => run_delete::<Preferences>(ctx, arg.id).await,
    }
}
