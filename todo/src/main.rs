//! Command-line demo for the todo engine.
//!
//! Opens the list stored in `TODO_DATA_FILE`, runs a short scripted session
//! against it, and prints the derived views along the way. Run it twice to
//! see the list survive a restart.

use composable_todo_runtime::{metrics::describe_store_metrics, Store};
use std::sync::Arc;
use todo::query::{self, SortOrder, Visibility};
use todo::{
    FileStorage, TodoConfig, TodoEnvironment, TodoItem, TodoStore, ViewAction, ViewReducer,
    ViewState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_view(title: &str, items: &[TodoItem]) {
    println!("\n{title}:");
    if items.is_empty() {
        println!("  (nothing to show)");
    }
    for todo in items {
        let status = if todo.completed { "✓" } else { " " };
        println!("  [{status}] {} ({})", todo.text, todo.id);
    }
}

fn main() -> anyhow::Result<()> {
    let config = TodoConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    describe_store_metrics();

    tracing::info!(
        data_file = %config.data_file.display(),
        key = %config.storage_key,
        format = %config.storage_format,
        "Starting todo demo"
    );

    let storage = Arc::new(FileStorage::new(&config.data_file));
    let mut todos = TodoStore::open(TodoEnvironment::from_config(&config, storage));
    let mut view = Store::new(
        ViewState::with_sort(config.default_sort),
        ViewReducer,
        (),
    );

    todos.subscribe(|action, list| {
        tracing::debug!(?action, items = list.len(), "Todo list changed");
    });

    println!("=== Todo Demo ===");
    print_view("Loaded", &todos.snapshot());

    let milk = todos.add("Buy milk")?;
    todos.add("Write documentation")?;
    let deploy = todos.add("Deploy to production")?;
    todos.add("   ")?;

    if let Some(milk) = &milk {
        todos.set_completed(milk.id, true)?;
    }
    if let Some(deploy) = &deploy {
        todos.set_text(deploy.id, "Deploy to staging")?;
    }

    let list = todos.snapshot();
    print_view("All", &view.state(|v| v.visible(&list)));

    view.send(ViewAction::SetVisibility(Visibility::Active))?;
    print_view("Active", &view.state(|v| v.visible(&list)));

    view.send(ViewAction::SetVisibility(Visibility::All))?;
    view.send(ViewAction::SetSort(SortOrder::Descending))?;
    view.send(ViewAction::SetSearch("DEPLOY".to_string()))?;
    print_view("Search \"DEPLOY\", newest first", &view.state(|v| v.visible(&list)));

    println!("\n{}", query::items_left_label(todos.remaining_count()));

    todos.clear_completed()?;
    let list = todos.snapshot();
    println!(
        "After clearing completed: {} ({} total)",
        query::items_left_label(query::remaining_count(&list)),
        list.len()
    );

    println!("\n=== Demo Complete ===");
    Ok(())
}
