//! `points` subcommands for daily points entries.

use clap::{Args, Subcommand};
use serde_json::Value;

use healthpoints_models::Points;
use healthpoints_store::sessions::EditMode;

use crate::client::{AppContext, CliResult};
use crate::commands::{
    IdArg, ListArgs, SearchArgs, push_field, run_delete, run_get, run_list, run_submit,
};
use crate::output::OutputFormat;

const COLUMNS: &[&str] = &["id", "date", "exercise", "meals", "alcohol", "notes", "user"];

#[derive(Subcommand)]
pub(crate) enum PointsCommand {
    /// List points entries.
    List(ListArgs),
    /// Search entries.
    Search(SearchArgs),
    /// Show one entry.
    Get(IdArg),
    /// Record a new entry.
    Create(PointsFields),
    /// Update an existing entry.
    Update(PointsUpdateArgs),
    /// Delete an entry.
    Delete(IdArg),
}

impl PointsCommand {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::List(_) => "points_list",
            Self::Search(_) => "points_search",
            Self::Get(_) => "points_get",
            Self::Create(_) => "points_create",
            Self::Update(_) => "points_update",
            Self::Delete(_) => "points_delete",
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct PointsFields {
    #[arg(long, help = "Entry date as YYYY-MM-DD")]
    pub(crate) date: Option<String>,
    #[arg(long, help = "Exercise point (0 or 1)")]
    pub(crate) exercise: Option<i32>,
    #[arg(long, help = "Meals point (0 or 1)")]
    pub(crate) meals: Option<i32>,
    #[arg(long, help = "Alcohol point (0 or 1)")]
    pub(crate) alcohol: Option<i32>,
    #[arg(long, help = "Free-form notes, at most 140 characters")]
    pub(crate) notes: Option<String>,
    #[arg(long, help = "Owning user identifier")]
    pub(crate) user: Option<i64>,
}

impl PointsFields {
    fn into_values(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "date", self.date);
        push_field(&mut fields, "exercise", self.exercise);
        push_field(&mut fields, "meals", self.meals);
        push_field(&mut fields, "alcohol", self.alcohol);
        push_field(&mut fields, "notes", self.notes);
        push_field(&mut fields, "user", self.user);
        fields
    }
}

#[derive(Args)]
pub(crate) struct PointsUpdateArgs {
    #[command(flatten)]
    pub(crate) id: IdArg,
    #[command(flatten)]
    pub(crate) fields: PointsFields,
}

pub(crate) async fn dispatch(
    ctx: &AppContext,
    command: PointsCommand,
    output: OutputFormat,
) -> CliResult<()> {
    match command {
        PointsCommand::List(args) => run_list::<Points>(ctx, &args, None, output, COLUMNS).await,
        PointsCommand::Search(args) => {
            run_list::<Points>(ctx, &args.list, Some(&args.query), output, COLUMNS).await
        }
        PointsCommand::Get(arg) => run_get::<Points>(ctx, arg.id, output).await,
        PointsCommand::Create(fields) => {
            run_submit::<Points>(ctx, EditMode::Create, fields.into_values(), output).await
        }
        PointsCommand::Update(args) => {
            run_submit::<Points>(
                ctx,
                EditMode::Edit(args.id.id),
                args.fields.into_values(),
                output,
            )
            .await
        }
        PointsCommand::Delete(arg) => run_delete::<Points>(ctx, arg.id).await,
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
    async fn create_posts_entry_and_refreshes_collection() {
        let server = MockServer::start_async().await;
        mock_users(&server);
        let post = server.mock(|when, then| {
            when.method(POST).path("/api/points").json_body(json!({
                "date": "2024-05-01",
                "exercise": 1,
                "meals": 1,
                "alcohol": 0,
                "user": {"id": 1, "login": "admin"}
            }));
            then.status(201).json_body(json!({"id": 8, "date": "2024-05-01"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(GET)
                .path("/api/points")
                .query_param_missing("page");
            then.status(200)
                .json_body(json!([{"id": 8, "date": "2024-05-01"}]));
        });

        let fields = PointsFields {
            date: Some("2024-05-01".to_string()),
            exercise: Some(1),
            meals: Some(1),
            alcohol: Some(0),
            notes: None,
            user: Some(1),
        };
        dispatch(
            &context_for(&server),
            PointsCommand::Create(fields),
            OutputFormat::Json,
        )
        .await
        .expect("create should succeed");

        post.assert();
        refresh.assert();
    }

    #[tokio::test]
    async fn overlong_notes_fail_validation() {
        let server = MockServer::start_async().await;
        mock_users(&server);

        let fields = PointsFields {
            date: Some("2024-05-01".to_string()),
            notes: Some("x".repeat(141)),
            ..PointsFields::default()
        };
        let err = dispatch(
            &context_for(&server),
            PointsCommand::Create(fields),
            OutputFormat::Json,
        )
        .await
        .expect_err("overlong notes must fail");

        assert!(matches!(err, CliError::Validation(message) if message.contains("140")));
    }
}
