/// Link button attached under every published submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishLink {
    pub label: String,
    pub url: String,
}
