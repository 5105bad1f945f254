//! Search result DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity kinds the search endpoint groups its results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchResultType {
    Client,
    Group,
    LoanAccount,
    SavingsAccount,
    User,
    Branch,
    Centre,
}

impl SearchResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchResultType::Client => "CLIENT",
            SearchResultType::Group => "GROUP",
            SearchResultType::LoanAccount => "LOAN_ACCOUNT",
            SearchResultType::SavingsAccount => "SAVINGS_ACCOUNT",
            SearchResultType::User => "USER",
            SearchResultType::Branch => "BRANCH",
            SearchResultType::Centre => "CENTRE",
        }
    }
}

impl fmt::Display for SearchResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(SearchResultType::Client),
            "GROUP" => Ok(SearchResultType::Group),
            "LOAN_ACCOUNT" => Ok(SearchResultType::LoanAccount),
            "SAVINGS_ACCOUNT" => Ok(SearchResultType::SavingsAccount),
            "USER" => Ok(SearchResultType::User),
            "BRANCH" => Ok(SearchResultType::Branch),
            "CENTRE" => Ok(SearchResultType::Centre),
            other => Err(format!("unknown search result type: {other}")),
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "resultID")]
    pub result_id: String,
    #[serde(rename = "displayString")]
    pub display_string: String,
}
