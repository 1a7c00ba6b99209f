//! `weight` subcommands for weight measurements.

use clap::{Args, Subcommand};
use serde_json::Value;

use healthpoints_models::Weight;
use healthpoints_store::sessions::EditMode;

use crate::client::{AppContext, CliResult};
use crate::commands::{
    IdArg, ListArgs, SearchArgs, push_field, run_delete, run_get, run_list, run_submit,
};
use crate::output::OutputFormat;

const COLUMNS: &[&str] = &["id", "timestamp", "weight", "user"];

#[derive(Subcommand)]
pub(crate) enum WeightCommand {
    /// List weight measurements.
    List(ListArgs),
    /// Search measurements.
    Search(SearchArgs),
    /// Show one measurement.
    Get(IdArg),
    /// Record a new measurement.
    Create(WeightFields),
    /// Update an existing measurement.
    Update(WeightUpdateArgs),
    /// Delete a measurement.
    Delete(IdArg),
}

impl WeightCommand {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::List(_) => "weight_list",
            Self::Search(_) => "weight_search",
            Self::Get(_) => "weight_get",
            Self::Create(_) => "weight_create",
            Self::Update(_) => "weight_update",
            Self::Delete(_) => "weight_delete",
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct WeightFields {
    #[arg(long, help = "Measurement time as YYYY-MM-DDTHH:MM")]
    pub(crate) timestamp: Option<String>,
    #[arg(long, help = "Measured weight")]
    pub(crate) weight: Option<f64>,
    #[arg(long, help = "Owning user identifier")]
    pub(crate) user: Option<i64>,
}

impl WeightFields {
    fn into_values(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "timestamp", self.timestamp);
        push_field(&mut fields, "weight", self.weight);
        push_field(&mut fields, "user", self.user);
        fields
    }
}

#[derive(Args)]
pub(crate) struct WeightUpdateArgs {
    #[command(flatten)]
    pub(crate) id: IdArg,
    #[command(flatten)]
    pub(crate) fields: WeightFields,
}

pub(crate) async fn dispatch(
    ctx: &AppContext,
    command: WeightCommand,
    output: OutputFormat,
) -> CliResult<()> {
    match command {
        WeightCommand::List(args) => run_list::<Weight>(ctx, &args, None, output, COLUMNS).await,
        WeightCommand::Search(args) => {
            run_list::<Weight>(ctx, &args.list, Some(&args.query), output, COLUMNS).await
        }
        WeightCommand::Get(arg) => run_get::<Weight>(ctx, arg.id, output).await,
        WeightCommand::Create(fields) => {
            run_submit::<Weight>(ctx, EditMode::Create, fields.into_values(), output).await
        }
        WeightCommand::Update(args) => {
            run_submit::<Weight>(
                ctx,
                EditMode::Edit(args.id.id),
                args.fields.into_values(),
                output,
            )
            .await
        }
        WeightCommand::Delete(arg) => run_delete::<Weight>(ctx, arg.id).await,
    }
}
