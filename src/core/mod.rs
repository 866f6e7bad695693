// Core matching pipeline
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod skill;
pub mod title;

pub use filters::{combine_candidates, filter_by_opinions};
pub use matcher::{CandidateFinder, MatchError, MatchStage};
pub use scoring::{
    skill_rarity_points, PassThroughRanker, RankerKind, RankingContext, RankingStrategy,
    SkillRarityRanker,
};
pub use skill::{match_by_skill, normalize_skill_name};
pub use title::{match_by_title, title_query, TitleQuery};
