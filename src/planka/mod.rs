use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Url};
use std::fmt;
use tracing::{debug, info};

use crate::model::{Board, Card, CardList, Project};
use crate::planka::model::{
    AccessTokenResp, ApiCard, ApiList, ApiUser, BoardResp, ProjectResp, ProjectsResp, UserResp,
};

pub mod model;

/// Read-only client for the Planka board API. Obtained via [`login`], which
/// performs the one authentication of the run.
///
/// [`login`]: PlankaClient::login
#[derive(Clone)]
pub struct PlankaClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for PlankaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlankaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PlankaClient {
    /// Authenticate with username/password and return a token-bearing client.
    pub async fn login(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid Planka base URL")?;
        let http = Client::builder()
            .user_agent("planka-duebot/0.1")
            .build()
            .expect("reqwest client");

        let endpoint = base_url
            .join("api/access-tokens")
            .context("invalid Planka base URL")?;
        let res = http
            .post(endpoint)
            .json(&serde_json::json!({
                "emailOrUsername": username,
                "password": password,
            }))
            .send()
            .await
            .context("failed to reach Planka")?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("planka authentication failed {}: {}", status, body));
        }
        let payload: AccessTokenResp = res
            .json()
            .await
            .context("invalid Planka access-token response")?;

        Ok(Self {
            http,
            base_url,
            token: payload.item,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("invalid Planka URL")?;
        debug!(%url, "fetching board resource");
        let res = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .context("failed to reach Planka")?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("planka error {}: {}", status, body));
        }
        res.json::<T>().await.context("invalid Planka response JSON")
    }

    /// The authenticated user, as the board reports it.
    pub async fn me(&self) -> Result<ApiUser> {
        let resp: UserResp = self.get_json("api/users/me").await?;
        Ok(resp.item)
    }

    /// Walk projects → boards → lists → cards and materialize the whole tree.
    /// Children keep the order the API yields them in.
    pub async fn fetch_tree(&self) -> Result<Vec<Project>> {
        let index: ProjectsResp = self.get_json("api/projects").await?;
        let mut projects = Vec::with_capacity(index.items.len());
        for api_project in index.items {
            let detail: ProjectResp = self
                .get_json(&format!("api/projects/{}", api_project.id))
                .await
                .with_context(|| format!("failed to fetch project '{}'", api_project.name))?;

            let mut boards = Vec::with_capacity(detail.included.boards.len());
            for api_board in detail.included.boards {
                let board: BoardResp = self
                    .get_json(&format!("api/boards/{}", api_board.id))
                    .await
                    .with_context(|| format!("failed to fetch board '{}'", api_board.name))?;
                let lists = assemble_lists(
                    board.included.lists,
                    board.included.cards,
                    &self.base_url,
                );
                boards.push(Board {
                    id: api_board.id,
                    name: api_board.name,
                    lists,
                });
            }
            projects.push(Project {
                id: detail.item.id,
                name: detail.item.name,
                boards,
            });
        }
        info!(projects = projects.len(), "fetched board tree");
        Ok(projects)
    }

    /// Canonical web link for a card.
    pub fn card_url(&self, card_id: &str) -> String {
        card_url(&self.base_url, card_id)
    }
}

/// `<base_url>/cards/<id>` — the link embedded in notifications.
pub fn card_url(base_url: &Url, card_id: &str) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{}/cards/{}", base, card_id)
}

/// Group a board's cards under their lists, preserving API order on both
/// sides. A card whose `listId` matches no returned list is dropped.
pub fn assemble_lists(lists: Vec<ApiList>, cards: Vec<ApiCard>, base_url: &Url) -> Vec<CardList> {
    lists
        .into_iter()
        .map(|list| {
            let cards = cards
                .iter()
                .filter(|card| card.list_id == list.id)
                .map(|card| Card {
                    id: card.id.clone(),
                    name: card.name.clone(),
                    due_date: card.due_date.clone(),
                    url: card_url(base_url, &card.id),
                })
                .collect();
            CardList {
                id: list.id,
                name: list.name,
                cards,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://planka.example.com").unwrap()
    }

    #[test]
    fn card_url_joins_without_double_slash() {
        assert_eq!(
            card_url(&base(), "card-1"),
            "https://planka.example.com/cards/card-1"
        );
        let trailing = Url::parse("https://planka.example.com/").unwrap();
        assert_eq!(
            card_url(&trailing, "card-1"),
            "https://planka.example.com/cards/card-1"
        );
    }

    #[test]
    fn board_response_deserializes_included_tree() {
        let body = serde_json::json!({
            "item": { "id": "b1", "name": "Sprint" },
            "included": {
                "lists": [
                    { "id": "l1", "name": "Doing", "position": 1 },
                    { "id": "l2", "name": "Done", "position": 2 }
                ],
                "cards": [
                    { "id": "c1", "name": "Ship it", "listId": "l1",
                      "dueDate": "2026-08-06T14:00:00.000Z" },
                    { "id": "c2", "name": "No deadline", "listId": "l2" }
                ]
            }
        });
        let resp: BoardResp = serde_json::from_value(body).unwrap();
        assert_eq!(resp.included.lists.len(), 2);
        assert_eq!(resp.included.cards.len(), 2);
        assert_eq!(
            resp.included.cards[0].due_date.as_deref(),
            Some("2026-08-06T14:00:00.000Z")
        );
        assert!(resp.included.cards[1].due_date.is_none());
    }

    #[test]
    fn board_response_tolerates_missing_included() {
        let resp: BoardResp = serde_json::from_value(serde_json::json!({
            "item": { "id": "b1", "name": "Empty" }
        }))
        .unwrap();
        assert!(resp.included.lists.is_empty());
        assert!(resp.included.cards.is_empty());
    }

    #[test]
    fn assemble_lists_groups_cards_in_api_order() {
        let lists = vec![
            ApiList {
                id: "l1".into(),
                name: "Doing".into(),
            },
            ApiList {
                id: "l2".into(),
                name: "Done".into(),
            },
        ];
        let cards = vec![
            ApiCard {
                id: "c2".into(),
                name: "second list card".into(),
                list_id: "l2".into(),
                due_date: None,
            },
            ApiCard {
                id: "c1a".into(),
                name: "first".into(),
                list_id: "l1".into(),
                due_date: Some("2026-08-06T14:00:00.000Z".into()),
            },
            ApiCard {
                id: "c1b".into(),
                name: "second".into(),
                list_id: "l1".into(),
                due_date: None,
            },
            ApiCard {
                id: "orphan".into(),
                name: "no such list".into(),
                list_id: "gone".into(),
                due_date: None,
            },
        ];

        let assembled = assemble_lists(lists, cards, &base());
        assert_eq!(assembled.len(), 2);
        let first: Vec<_> = assembled[0].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(first, vec!["c1a", "c1b"]);
        assert_eq!(assembled[1].cards.len(), 1);
        assert_eq!(
            assembled[0].cards[0].url,
            "https://planka.example.com/cards/c1a"
        );
    }
}
