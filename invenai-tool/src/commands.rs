use std::path::Path;

use invenai_core::{
    InventoryItem, InventorySession, InventoryStats, ItemDraft, ItemId, ManualForm, quantity,
};
use invenai_http::{AppState, RemoteAssistant, RemoteCollection};
use invenai_openai::{AssistClient, image_data_url, media_type_for};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::InvError;
use crate::store::AnyCollection;

/// Client-side handles for a running server.
pub struct Remote {
    pub session: InventorySession<RemoteCollection>,
    pub assistant: RemoteAssistant,
}

impl Remote {
    pub fn connect(server: &str) -> Self {
        Self {
            session: InventorySession::new(RemoteCollection::new(server)),
            assistant: RemoteAssistant::new(server),
        }
    }
}

/// Optional field edits for `inv update`.
#[derive(Debug, Default)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
}

impl ItemEdit {
    /// Builds the replacement record. Identity and `dateAdded` are kept.
    pub fn apply(self, item: InventoryItem) -> InventoryItem {
        InventoryItem {
            name: self.name.unwrap_or(item.name),
            description: self.description.unwrap_or(item.description),
            quantity: self
                .quantity
                .map(|q| quantity::coerce_str(&q))
                .unwrap_or(item.quantity),
            category: self.category.unwrap_or(item.category),
            ..item
        }
    }
}

pub async fn serve(settings: &Settings) -> Result<(), InvError> {
    let addr = settings.bind_addr()?;
    let collection = AnyCollection::open(settings.store_type, &settings.store_path)?;
    info!(store = %settings.store_type, path = %settings.store_path.display(), "opened store");

    let mut state = AppState::new(collection);
    match &settings.api_key {
        Some(key) => {
            let assistant = AssistClient::with_base_url(key, &settings.openai_base_url)
                .with_model(&settings.model);
            state = state.with_assistant(assistant);
        }
        None => warn!("no OpenAI API key configured, assistant endpoints will answer 503"),
    }

    let listener = TcpListener::bind(addr).await?;
    invenai_http::serve(listener, state, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

pub async fn list(remote: &Remote) -> Result<(), InvError> {
    remote.session.hydrate().await?;
    print_items(&remote.session.items());
    Ok(())
}

pub async fn add(remote: &Remote, form: ManualForm) -> Result<(), InvError> {
    let draft = ItemDraft::from_form(&form)?;
    add_and_commit(remote, draft).await
}

async fn add_and_commit(remote: &Remote, draft: ItemDraft) -> Result<(), InvError> {
    remote.session.hydrate().await?;
    let item = remote.session.add(draft);
    remote.session.commit().await?;
    println!("Added {} ({})", item.name, item.id);
    Ok(())
}

pub async fn suggest(
    remote: &Remote,
    query: &str,
    pick: Option<usize>,
    describe: bool,
) -> Result<(), InvError> {
    let suggestions = remote.assistant.suggest(query).await?;
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, suggestion);
    }

    let Some(index) = pick else {
        return Ok(());
    };
    let name = index
        .checked_sub(1)
        .and_then(|i| suggestions.get(i))
        .ok_or(InvError::NoSuggestion {
            index,
            count: suggestions.len(),
        })?;

    let draft = if describe {
        let described = remote.assistant.describe(name).await?;
        ItemDraft::from_description(name, described)
    } else {
        ItemDraft::from_suggestion(name)
    };
    add_and_commit(remote, draft).await
}

pub async fn describe(remote: &Remote, name: &str) -> Result<(), InvError> {
    let described = remote.assistant.describe(name).await?;
    println!("Description: {}", described.description);
    println!("Category:    {}", described.category);
    Ok(())
}

pub async fn recognize(remote: &Remote, image: &Path, dry_run: bool) -> Result<(), InvError> {
    let bytes = tokio::fs::read(image).await?;
    let media_type = image
        .extension()
        .and_then(|e| e.to_str())
        .map(media_type_for)
        .unwrap_or("image/png");

    let recognition = remote
        .assistant
        .recognize(image_data_url(media_type, &bytes))
        .await?;
    let draft = ItemDraft::from_recognition(recognition);
    println!("Name:        {}", draft.name);
    println!("Description: {}", draft.description);
    println!("Category:    {}", draft.category);

    if dry_run {
        return Ok(());
    }
    add_and_commit(remote, draft).await
}

pub async fn update(remote: &Remote, id: ItemId, edit: ItemEdit) -> Result<(), InvError> {
    remote.session.hydrate().await?;
    let current = remote
        .session
        .store()
        .get(&id)
        .ok_or_else(|| InvError::ItemNotFound(id.clone()))?;

    remote.session.update(edit.apply(current));
    remote.session.commit().await?;
    println!("Updated {id}");
    Ok(())
}

pub async fn delete(remote: &Remote, id: ItemId) -> Result<(), InvError> {
    let outcome = remote.session.delete(&id).await?;
    println!("{}", outcome.message());
    Ok(())
}

pub async fn stats(remote: &Remote) -> Result<(), InvError> {
    remote.session.hydrate().await?;
    print_stats(&remote.session.stats());
    Ok(())
}

fn print_items(items: &[InventoryItem]) {
    if items.is_empty() {
        println!("No items.");
        return;
    }
    println!("{:<36}  {:<24}  {:>5}  {:<16}  ADDED", "ID", "NAME", "QTY", "CATEGORY");
    for item in items {
        println!(
            "{:<36}  {:<24}  {:>5}  {:<16}  {}",
            item.id,
            truncate(&item.name, 24),
            item.quantity,
            truncate(item.category_label(), 16),
            item.date_added.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_stats(stats: &InventoryStats) {
    println!("Items:    {}", stats.total_items);
    println!("Units:    {}", stats.total_quantity);
    if let Some(id) = &stats.most_recent {
        println!("Newest:   {id}");
    }
    for (category, totals) in &stats.categories {
        println!("  {:<24} {:>4} items {:>6} units", category, totals.items, totals.quantity);
    }
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_keeps_identity() {
        let item = ItemDraft::new("Chair").with_quantity(4).into_item();
        let edit = ItemEdit {
            quantity: Some(" 2 ".to_string()),
            category: Some("Furniture".to_string()),
            ..ItemEdit::default()
        };
        let updated = edit.apply(item.clone());

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.date_added, item.date_added);
        assert_eq!(updated.name, "Chair");
        assert_eq!(updated.quantity, 2);
        assert_eq!(updated.category, "Furniture");
    }

    #[test]
    fn edit_with_bad_quantity_defaults() {
        let item = ItemDraft::new("Chair").with_quantity(4).into_item();
        let edit = ItemEdit {
            quantity: Some("many".to_string()),
            ..ItemEdit::default()
        };
        assert_eq!(edit.apply(item).quantity, 1);
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Lamp", 8), "Lamp");
        assert_eq!(truncate("Extension cord", 8), "Extensi…");
    }
}
