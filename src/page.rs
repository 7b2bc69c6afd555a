//! Dashboard page rendering
//!
//! One call per interaction: the page is rebuilt top to bottom from the
//! posted selections, re-issuing every discovery query.

use crate::audience::{AudienceListing, FormRenderer};
use crate::config::AudienceConfig;
use crate::error::AppError;
use crate::introspection::MetadataBrowser;
use crate::models::{GrantInstructions, IdType, PageState, Selections, Selector};
use crate::session::WarehouseSession;
use tracing::{debug, warn};

pub const TITLE: &str = "Secure Audience Manager";

const GRANT_STATEMENTS: &str = "\
GRANT USAGE ON DATABASE <DATABASE> TO APPLICATION <APP_NAME>;
GRANT USAGE ON SCHEMA <DATABASE.SCHEMA> TO APPLICATION <APP_NAME>;
GRANT SELECT ON TABLE <DATABASE.SCHEMA.TABLE> TO APPLICATION <APP_NAME>;
";

pub struct PageRenderer;

impl PageRenderer {
    pub async fn render(
        session: &dyn WarehouseSession,
        config: &AudienceConfig,
        selections: &Selections,
    ) -> Result<PageState, AppError> {
        let browser = MetadataBrowser::new(session);

        let current_database = browser.current_database().await?;
        let databases = browser
            .list_databases(&current_database, &config.reserved_databases)
            .await?;
        let database = choose("Select a Database", databases, selections.database.as_deref());

        let grant_instructions = match database.selected {
            Some(_) => None,
            None => Some(grant_instructions(&current_database)),
        };

        let schema = match &database.selected {
            Some(db) => choose(
                "Select a Schema",
                browser.list_schemas(db).await?,
                selections.schema.as_deref(),
            ),
            None => empty("Select a Schema"),
        };

        let table = match (&database.selected, &schema.selected) {
            (Some(db), Some(sc)) => choose(
                "Select a Table",
                browser.list_tables(db, sc).await?,
                selections.table.as_deref(),
            ),
            _ => empty("Select a Table"),
        };

        let column = match (&database.selected, &schema.selected, &table.selected) {
            (Some(db), Some(sc), Some(tb)) => choose(
                "Select your primary identifier",
                browser.list_columns(db, sc, tb).await?,
                selections.column.as_deref(),
            ),
            _ => empty("Select your primary identifier"),
        };

        let id_type = Selector {
            label: "Select your ID type".to_string(),
            options: IdType::ALL.to_vec(),
            selected: Some(selections.id_type.unwrap_or_default()),
        };

        let form = FormRenderer::render(&selections.form);
        let created_audiences = AudienceListing::fetch(session, &config.metadata_table).await?;

        debug!(
            "Rendered page for {:?}.{:?}.{:?} ({} form, {} refresh)",
            database.selected,
            schema.selected,
            table.selected,
            form.audience_type.selected.unwrap_or_default().as_str(),
            form.effective_frequency().as_str()
        );

        Ok(PageState {
            title: TITLE.to_string(),
            current_database,
            database,
            schema,
            table,
            column,
            id_type,
            grant_instructions,
            form,
            created_audiences,
        })
    }
}

/// Keep the requested option when still offered, else fall back to the first
fn choose(label: &str, options: Vec<String>, requested: Option<&str>) -> Selector<String> {
    let selected = match requested {
        Some(name) if options.iter().any(|o| o == name) => Some(name.to_string()),
        Some(name) => {
            warn!("{}: '{}' is no longer available", label, name);
            options.first().cloned()
        }
        None => options.first().cloned(),
    };

    Selector {
        label: label.to_string(),
        options,
        selected,
    }
}

fn empty(label: &str) -> Selector<String> {
    Selector {
        label: label.to_string(),
        options: Vec::new(),
        selected: None,
    }
}

fn grant_instructions(app_name: &str) -> GrantInstructions {
    GrantInstructions {
        message: format!(
            "You'll need to grant read access of your data to the app - execute the commands \
             below with your database, schema, and table and then refresh this page. \
             <APP_NAME> should be {}",
            app_name
        ),
        code: GRANT_STATEMENTS.to_string(),
    }
}
