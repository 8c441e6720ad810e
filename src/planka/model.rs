use serde::Deserialize;

/// `POST /api/access-tokens` — the token is the whole item.
#[derive(Deserialize, Debug)]
pub struct AccessTokenResp {
    pub item: String,
}

#[derive(Deserialize, Debug)]
pub struct UserResp {
    pub item: ApiUser,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: String,
    pub name: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ProjectsResp {
    pub items: Vec<ApiProject>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiProject {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct ProjectResp {
    pub item: ApiProject,
    #[serde(default)]
    pub included: ProjectIncluded,
}

#[derive(Deserialize, Debug, Default)]
pub struct ProjectIncluded {
    #[serde(default)]
    pub boards: Vec<ApiBoard>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiBoard {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct BoardResp {
    #[serde(default)]
    pub included: BoardIncluded,
}

#[derive(Deserialize, Debug, Default)]
pub struct BoardIncluded {
    #[serde(default)]
    pub lists: Vec<ApiList>,
    #[serde(default)]
    pub cards: Vec<ApiCard>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiList {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiCard {
    pub id: String,
    pub name: String,
    pub list_id: String,
    #[serde(default)]
    pub due_date: Option<String>,
}
