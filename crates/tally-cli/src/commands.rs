//! CLI command implementations

use anyhow::{Result, bail};
use colored::Colorize;
use serde::Deserialize;
use tabled::{Table, Tabled};
use tally_core::ListItem;

/// Mirror of the API response envelope
#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> ApiReply<T> {
    /// Unwrap the data payload, or fail with the server's error message
    fn into_data(self) -> Result<T> {
        if !self.success {
            bail!(
                self.error
                    .unwrap_or_else(|| "request failed".to_string())
            );
        }
        self.data
            .ok_or_else(|| anyhow::anyhow!("empty response from server"))
    }
}

/// HTTP client for a running tally-api
pub struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    pub fn new(base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }
}

#[derive(Tabled)]
struct ItemRow {
    index: u32,
    marked: String,
    content: String,
}

impl From<&ListItem> for ItemRow {
    fn from(item: &ListItem) -> Self {
        Self {
            index: item.index,
            marked: if item.marked { "x".to_string() } else { String::new() },
            content: item.content.clone(),
        }
    }
}

pub async fn add(
    client: &Client,
    index: u32,
    content: Option<String>,
    marked: bool,
    json: bool,
) -> Result<()> {
    let mut item = ListItem::new(index);
    if let Some(content) = content {
        item.content = content;
    }
    item.marked = marked;

    let reply: ApiReply<serde_json::Value> = client
        .http
        .post(client.url("/list/items"))
        .json(&vec![item.clone()])
        .send()
        .await?
        .json()
        .await?;
    reply.into_data()?;

    if json {
        println!("{}", serde_json::to_string(&item)?);
    } else {
        println!("{} Added item: {}", "✓".green(), item);
    }

    Ok(())
}

pub async fn list(
    client: &Client,
    index: Option<u32>,
    from: Option<u32>,
    to: Option<u32>,
    json: bool,
) -> Result<()> {
    if from.is_some() != to.is_some() {
        bail!("--from and --to must be given together");
    }

    let mut request = client.http.get(client.url("/list/items"));
    if let Some(index) = index {
        request = request.query(&[("specific_index", index)]);
    }
    if let (Some(from), Some(to)) = (from, to) {
        request = request.query(&[("start_index", from), ("end_index", to)]);
    }

    let reply: ApiReply<Vec<ListItem>> = request.send().await?.json().await?;
    let items = reply.into_data()?;

    if json {
        println!("{}", serde_json::to_string(&items)?);
    } else if items.is_empty() {
        println!("No items found");
    } else {
        let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}

pub async fn set(
    client: &Client,
    index: u32,
    content: Option<String>,
    marked: bool,
    json: bool,
) -> Result<()> {
    let mut item = ListItem::new(index);
    if let Some(content) = content {
        item.content = content;
    }
    item.marked = marked;

    let reply: ApiReply<serde_json::Value> = client
        .http
        .put(client.url("/list/items"))
        .json(&vec![item.clone()])
        .send()
        .await?
        .json()
        .await?;
    reply.into_data()?;

    if json {
        println!("{}", serde_json::to_string(&item)?);
    } else {
        println!("{} Replaced item: {}", "✓".green(), item);
    }

    Ok(())
}

pub async fn rm(
    client: &Client,
    index: Option<u32>,
    from: Option<u32>,
    to: Option<u32>,
    content: Option<String>,
    json: bool,
) -> Result<()> {
    if from.is_some() != to.is_some() {
        bail!("--from and --to must be given together");
    }
    if index.is_none() && from.is_none() && content.is_none() {
        bail!("specify --index, --from/--to, or --content");
    }

    let mut request = client.http.delete(client.url("/list/items"));
    if let Some(index) = index {
        request = request.query(&[("specific_index", index)]);
    }
    if let (Some(from), Some(to)) = (from, to) {
        request = request.query(&[("start_index", from), ("end_index", to)]);
    }
    if let Some(ref content) = content {
        request = request.query(&[("content", content)]);
    }

    let reply: ApiReply<serde_json::Value> = request.send().await?.json().await?;
    let data = reply.into_data()?;
    let removed = data["removed"].as_u64().unwrap_or(0);

    if json {
        println!("{}", data);
    } else {
        println!("{} Removed {} item(s)", "✓".green(), removed);
    }

    Ok(())
}

pub async fn clear(client: &Client, json: bool) -> Result<()> {
    let reply: ApiReply<serde_json::Value> = client
        .http
        .get(client.url("/api/clear"))
        .send()
        .await?
        .json()
        .await?;
    let data = reply.into_data()?;

    if json {
        println!("{}", data);
    } else {
        let cleared = data["cleared"].as_u64().unwrap_or(0);
        println!("{} Cleared {} item(s)", "✓".green(), cleared);
    }

    Ok(())
}

pub async fn seed(client: &Client, count: Option<u32>, json: bool) -> Result<()> {
    let mut request = client.http.get(client.url("/api/seed"));
    if let Some(count) = count {
        request = request.query(&[("n", count)]);
    }

    let reply: ApiReply<serde_json::Value> = request.send().await?.json().await?;
    let data = reply.into_data()?;

    if json {
        println!("{}", data);
    } else {
        let seeded = data["seeded"].as_u64().unwrap_or(0);
        println!("{} Seeded {} item(s)", "✓".green(), seeded);
    }

    Ok(())
}
