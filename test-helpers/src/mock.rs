//! Development dataset for the stand-in API.
//!
//! Everything is created through the public client, so the dataset also
//! exercises the same endpoints the admin UI uses. It contains two award
//! programs, a handful of categories with weighted criteria, media channels,
//! journalists and judges, and enough applications to page through.

use crate::TestApp;
use anyhow::Result;
use payloads::{
    Application, Award, Category, Criterion, MediaChannel, Resource, Role,
    Score, User, requests,
};
use serde_json::json;

const CATEGORIES: &[(&str, &str)] = &[
    ("Investigative Reporting", "Long-form investigations"),
    ("Data Journalism", "Stories driven by data analysis"),
    ("Photojournalism", "Single images and photo essays"),
    ("Broadcast Feature", "Radio and television features"),
    ("Environmental Reporting", "Climate and conservation coverage"),
    ("Business Reporting", "Economy and markets"),
    ("Health Reporting", "Public health and medicine"),
    ("Sports Journalism", "Sports features and reporting"),
    ("Digital Storytelling", "Interactive and multimedia work"),
    ("Young Journalist", "Entrants under thirty"),
    ("Editorial Cartoon", "Illustrated commentary"),
    ("Community Journalism", "Local and regional reporting"),
];

/// Name and weight, applied to every category. Weights add up to 100.
const CRITERIA: &[(&str, u32)] = &[
    ("Originality", 30),
    ("Impact", 30),
    ("Accuracy", 25),
    ("Presentation", 15),
];

const MEDIA_CHANNELS: &[(&str, Option<&str>)] = &[
    ("The Daily Ledger", Some("https://ledger.example")),
    ("Harbour Radio", Some("https://harbourradio.example")),
    ("Metro TV", None),
    ("Kampung Weekly", Some("https://kampungweekly.example")),
];

const JOURNALISTS: &[(&str, &str)] = &[
    ("Aisha Rahman", "aisha@ledger.example"),
    ("Ben Tan", "ben@harbourradio.example"),
    ("Chitra Nair", "chitra@metrotv.example"),
    ("Daniel Lim", "daniel@kampungweekly.example"),
];

const JUDGES: &[(&str, &str)] = &[
    ("Eleanor Wong", "eleanor@judges.example"),
    ("Farid Hassan", "farid@judges.example"),
];

pub struct DevDataset {
    pub current_award: Award,
    pub past_award: Award,
    pub categories: Vec<Category>,
    pub criteria: Vec<Criterion>,
    pub media_channels: Vec<MediaChannel>,
    pub journalists: Vec<User>,
    pub judges: Vec<User>,
    pub applications: Vec<Application>,
    pub scores: Vec<Score>,
}

impl DevDataset {
    /// Sign in as the administrator and create the full dataset.
    pub async fn create(app: &TestApp) -> Result<Self> {
        app.login_admin().await?;

        tracing::info!("🏆 Creating award programs");
        let past_award = app.create_award("EJAT 2024", 2024).await?;
        let current_award = app.create_award("EJAT 2025", 2025).await?;
        let closed = requests::UpdateAward {
            id: past_award.id,
            name: past_award.name.clone(),
            year: past_award.year,
            is_open: false,
        };
        let past_award = app.awards().update(&closed, "").await?.data;

        tracing::info!("🗂️ Creating categories and criteria");
        let mut categories = Vec::with_capacity(CATEGORIES.len());
        let mut criteria = Vec::new();
        for (name, description) in CATEGORIES {
            let category = app
                .categories()
                .create(
                    &requests::CreateCategory {
                        name: (*name).into(),
                        description: Some((*description).into()),
                    },
                    "",
                )
                .await?
                .data;
            for (criterion, weight) in CRITERIA {
                let details = requests::CreateCriterion {
                    category_id: category.id,
                    name: (*criterion).into(),
                    weight: *weight,
                };
                criteria.push(app.criteria().create(&details, "").await?.data);
            }
            categories.push(category);
        }

        tracing::info!("📰 Creating media channels");
        let mut media_channels = Vec::with_capacity(MEDIA_CHANNELS.len());
        for (name, website) in MEDIA_CHANNELS {
            let details = requests::CreateMediaChannel {
                name: (*name).into(),
                website: website.map(str::to_string),
            };
            media_channels
                .push(app.media_channels().create(&details, "").await?.data);
        }

        tracing::info!("👤 Creating journalists and judges");
        let journalists = create_users(app, JOURNALISTS, Role::Journalist).await?;
        let judges = create_users(app, JUDGES, Role::Judge).await?;

        tracing::info!("📝 Creating applications and scores");
        let applications_resource: Resource<Application> =
            Resource::new(app.client.clone(), "/applications");
        let scores_resource: Resource<Score> =
            Resource::new(app.client.clone(), "/scores");

        let mut applications = Vec::new();
        for (i, journalist) in journalists.iter().enumerate() {
            for (j, category) in categories.iter().take(3).enumerate() {
                let status = if (i + j) % 3 == 0 {
                    "shortlisted"
                } else {
                    "submitted"
                };
                let details = json!({
                    "awardId": current_award.id,
                    "categoryId": category.id,
                    "journalistId": journalist.id,
                    "title": format!("{} entry by {}", category.name, journalist.name),
                    "status": status,
                });
                applications
                    .push(applications_resource.create(&details, "").await?.data);
            }
        }

        let mut scores = Vec::new();
        for application in applications.iter().filter(|application| {
            application.status == payloads::ApplicationStatus::Shortlisted
        }) {
            let category_criteria = criteria
                .iter()
                .filter(|criterion| criterion.category_id == application.category_id);
            for (judge, criterion) in judges.iter().cycle().zip(category_criteria) {
                let details = json!({
                    "applicationId": application.id,
                    "criterionId": criterion.id,
                    "judgeId": judge.id,
                    "value": 7,
                    "comment": null,
                });
                scores.push(scores_resource.create(&details, "").await?.data);
            }
        }

        Ok(Self {
            current_award,
            past_award,
            categories,
            criteria,
            media_channels,
            journalists,
            judges,
            applications,
            scores,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Development dataset");
        tracing::info!(
            "   Awards: {} (open), {} (closed)",
            self.current_award.name,
            self.past_award.name
        );
        tracing::info!(
            "   Categories: {} ({} criteria)",
            self.categories.len(),
            self.criteria.len()
        );
        tracing::info!("   Media channels: {}", self.media_channels.len());
        tracing::info!(
            "   Users: {} journalists, {} judges",
            self.journalists.len(),
            self.judges.len()
        );
        tracing::info!(
            "   Applications: {} ({} scores)",
            self.applications.len(),
            self.scores.len()
        );
    }
}

async fn create_users(
    app: &TestApp,
    people: &[(&str, &str)],
    role: Role,
) -> Result<Vec<User>> {
    let mut users = Vec::with_capacity(people.len());
    for (name, email) in people {
        let details = requests::CreateUser {
            name: (*name).into(),
            email: (*email).into(),
            role,
        };
        users.push(app.users().create(&details, "").await?.data);
    }
    Ok(users)
}
