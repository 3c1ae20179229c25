pub mod json_api;

pub use json_api::{
    analyze_match_json, pass_network_json, MatchAnalysisRequest, MatchAnalysisResponse,
    PassNetworkRequest, PassNetworkResponse,
};
