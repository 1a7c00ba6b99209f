//! `bp` subcommands for blood pressure readings.

use clap::{Args, Subcommand};
use serde_json::Value;

use healthpoints_models::BloodPressure;
use healthpoints_store::sessions::EditMode;

use crate::client::{AppContext, CliResult};
use crate::commands::{
    IdArg, ListArgs, SearchArgs, push_field, run_delete, run_get, run_list, run_submit,
};
use crate::output::OutputFormat;

const COLUMNS: &[&str] = &["id", "timestamp", "systolic", "diastolic", "user"];

#[derive(Subcommand)]
pub(crate) enum BloodPressureCommand {
    /// List blood pressure readings.
    List(ListArgs),
    /// Search readings.
    Search(SearchArgs),
    /// Show one reading.
    Get(IdArg),
    /// Record a new reading.
    Create(BloodPressureFields),
    /// Update an existing reading.
    Update(BloodPressureUpdateArgs),
    /// Delete a reading.
    Delete(IdArg),
}

impl BloodPressureCommand {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::List(_) => "bp_list",
            Self::Search(_) => "bp_search",
            Self::Get(_) => "bp_get",
            Self::Create(_) => "bp_create",
            Self::Update(_) => "bp_update",
            Self::Delete(_) => "bp_delete",
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct BloodPressureFields {
    #[arg(long, help = "Reading time as YYYY-MM-DDTHH:MM")]
    pub(crate) timestamp: Option<String>,
    #[arg(long, help = "Systolic pressure in mmHg")]
    pub(crate) systolic: Option<i32>,
    #[arg(long, help = "Diastolic pressure in mmHg")]
    pub(crate) diastolic: Option<i32>,
    #[arg(long, help = "Owning user identifier")]
    pub(crate) user: Option<i64>,
}

impl BloodPressureFields {
    fn into_values(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "timestamp", self.timestamp);
        push_field(&mut fields, "systolic", self.systolic);
        push_field(&mut fields, "diastolic", self.diastolic);
        push_field(&mut fields, "user", self.user);
        fields
    }
}

#[derive(Args)]
pub(crate) struct BloodPressureUpdateArgs {
    #[command(flatten)]
    pub(crate) id: IdArg,
    #[command(flatten)]
    pub(crate) fields: BloodPressureFields,
}

pub(crate) async fn dispatch(
    ctx: &AppContext,
    command: BloodPressureCommand,
    output: OutputFormat,
) -> CliResult<()> {
    match command {
        BloodPressureCommand::List(args) => {
            run_list::<BloodPressure>(ctx, &args, None, output, COLUMNS).await
        }
        BloodPressureCommand::Search(args) => {
            run_list::<BloodPressure>(ctx, &args.list, Some(&args.query), output, COLUMNS).await
        }
        BloodPressureCommand::Get(arg) => run_get::<BloodPressure>(ctx, arg.id, output).await,
        BloodPressureCommand::Create(fields) => {
            run_submit::<BloodPressure>(ctx, EditMode::Create, fields.into_values(), output).await
        }
        BloodPressureCommand::Update(args) => {
            run_submit::<BloodPressure>(
                ctx,
                EditMode::Edit(args.id.id),
                args.fields.into_values(),
                output,
            )
            .await
        }
        BloodPressureCommand::Delete(arg) => run_delete::<BloodPressure>(ctx, arg.id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CliError;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;

    fn context_for(server: &MockServer) -> AppContext {
        AppContext {
            client: Client::new(),
            base_url: server.base_url().parse().expect("valid URL"),
        }
    }

    fn mock_users(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200)
                .json_body(json!([{"id": 1, "login": "admin"}]));
        });
    }

    #[tokio::test]
    async fn create_posts_converted_payload() {
        let server = MockServer::start_async().await;
        mock_users(&server);
        let post = server.mock(|when, then| {
            when.method(POST).path("/api/blood-pressures").json_body(json!({
                "timestamp": "2024-05-01T08:30:00Z",
                "systolic": 120,
                "diastolic": 80,
                "user": {"id": 1, "login": "admin"}
            }));
            then.status(201).json_body(json!({"id": 4}));
        });

        let fields = BloodPressureFields {
            timestamp: Some("2024-05-01T08:30".to_string()),
            systolic: Some(120),
            diastolic: Some(80),
            user: Some(1),
        };
        dispatch(
            &context_for(&server),
            BloodPressureCommand::Create(fields),
            OutputFormat::Json,
        )
        .await
        .expect("create should succeed");
        post.assert();
    }

    #[tokio::test]
    async fn empty_create_fails_validation() {
        let server = MockServer::start_async().await;
        mock_users(&server);
        let post = server.mock(|when, then| {
            when.method(POST).path("/api/blood-pressures");
            then.status(201).json_body(json!({"id": 4}));
        });

        let err = dispatch(
            &context_for(&server),
            BloodPressureCommand::Create(BloodPressureFields::default()),
            OutputFormat::Json,
        )
        .await
        .expect_err("empty form must fail");

        assert!(matches!(err, CliError::Validation(message) if message.contains("systolic")));
        assert_eq!(post.calls(), 0);
    }

    #[tokio::test]
    async fn get_renders_one_reading() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/blood-pressures/4");
            then.status(200)
                .json_body(json!({"id": 4, "systolic": 120, "diastolic": 80}));
        });

        dispatch(
            &context_for(&server),
            BloodPressureCommand::Get(IdArg { id: 4 }),
            OutputFormat::Table,
        )
        .await
        .expect("get should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn missing_reading_is_a_validation_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/blood-pressures/404");
            then.status(404);
        });

        let err = dispatch(
            &context_for(&server),
            BloodPressureCommand::Get(IdArg { id: 404 }),
            OutputFormat::Table,
        )
        .await
        .expect_err("unknown id must fail");
        assert_eq!(err.exit_code(), 2);
    }
}
