//! Team roster and leadership models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role held by a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Convenor,
    CoConvenor,
    Secretary,
    CoSecretary,
    Treasurer,
    CoTreasurer,
    SocialMediaHead,
    ItBlogHead,
    ResearchOutreachHead,
    StudentMentor,
    MediationCellHead,
    StudentMember,
    Member,
}

/// Position titles used in the roster files, lowercased
const POSITION_TABLE: &[(&str, TeamRole)] = &[
    ("convenor", TeamRole::Convenor),
    ("co-convenor", TeamRole::CoConvenor),
    ("secretary", TeamRole::Secretary),
    ("co-secretary", TeamRole::CoSecretary),
    ("treasurer", TeamRole::Treasurer),
    ("co-treasurer", TeamRole::CoTreasurer),
    ("social media head", TeamRole::SocialMediaHead),
    ("it and blog head", TeamRole::ItBlogHead),
    ("research and outreach head", TeamRole::ResearchOutreachHead),
    ("student mentor", TeamRole::StudentMentor),
    ("mediation cell head", TeamRole::MediationCellHead),
    ("student member", TeamRole::StudentMember),
];

impl TeamRole {
    pub const ALL: [TeamRole; 13] = [
        TeamRole::Convenor,
        TeamRole::CoConvenor,
        TeamRole::Secretary,
        TeamRole::CoSecretary,
        TeamRole::Treasurer,
        TeamRole::CoTreasurer,
        TeamRole::SocialMediaHead,
        TeamRole::ItBlogHead,
        TeamRole::ResearchOutreachHead,
        TeamRole::StudentMentor,
        TeamRole::MediationCellHead,
        TeamRole::StudentMember,
        TeamRole::Member,
    ];

    /// Map a free-text position title to a role. Case-insensitive, surrounding
    /// whitespace ignored; unknown titles become `Member`.
    pub fn from_position(position: &str) -> Self {
        let key = position.trim().to_lowercase();
        POSITION_TABLE
            .iter()
            .find(|(title, _)| *title == key)
            .map(|(_, role)| *role)
            .unwrap_or(TeamRole::Member)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Convenor => "convenor",
            TeamRole::CoConvenor => "co_convenor",
            TeamRole::Secretary => "secretary",
            TeamRole::CoSecretary => "co_secretary",
            TeamRole::Treasurer => "treasurer",
            TeamRole::CoTreasurer => "co_treasurer",
            TeamRole::SocialMediaHead => "social_media_head",
            TeamRole::ItBlogHead => "it_blog_head",
            TeamRole::ResearchOutreachHead => "research_outreach_head",
            TeamRole::StudentMentor => "student_mentor",
            TeamRole::MediationCellHead => "mediation_cell_head",
            TeamRole::StudentMember => "student_member",
            TeamRole::Member => "member",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|role| role.as_str() == s)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TeamRole::Convenor => "Convenor",
            TeamRole::CoConvenor => "Co-convenor",
            TeamRole::Secretary => "Secretary",
            TeamRole::CoSecretary => "Co-secretary",
            TeamRole::Treasurer => "Treasurer",
            TeamRole::CoTreasurer => "Co-Treasurer",
            TeamRole::SocialMediaHead => "Social Media Head",
            TeamRole::ItBlogHead => "IT and Blog Head",
            TeamRole::ResearchOutreachHead => "Research and Outreach Head",
            TeamRole::StudentMentor => "Student Mentor",
            TeamRole::MediationCellHead => "Mediation Cell Head",
            TeamRole::StudentMember => "Student Member",
            TeamRole::Member => "Member",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Team member entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: TeamRole,
    pub batch: String,
    pub email: String,
    pub linkedin_url: String,
    pub bio: String,
    pub image: Option<String>,
    pub active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMemberInput {
    pub name: String,
    pub role: TeamRole,
    pub batch: String,
    pub email: String,
    pub linkedin_url: String,
    pub bio: String,
    pub image: Option<String>,
    pub active: bool,
    pub sort_order: i64,
}

/// Faculty leadership entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Leadership {
    pub id: String,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub email: String,
    pub image: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadershipInput {
    pub name: String,
    pub position: String,
    pub bio: String,
    pub email: String,
    pub image: Option<String>,
    pub sort_order: i64,
}
