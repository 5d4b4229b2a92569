use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeInfo {
    pub like_count: i64,
    pub liked_by_user: bool,
}
