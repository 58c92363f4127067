use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{JobListing, NewJob};

pub const ENDPOINT_ENV: &str = "RESUME_API_URL";

/// Wire shape for one job listing, shared by push and pull.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&JobListing> for JobPayload {
    fn from(job: &JobListing) -> Self {
        JobPayload {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            url: job.url.clone(),
            notes: job.notes.clone(),
        }
    }
}

impl From<JobPayload> for NewJob {
    fn from(payload: JobPayload) -> Self {
        NewJob {
            title: payload.title,
            company: payload.company,
            location: payload.location,
            url: payload.url,
            notes: payload.notes,
        }
    }
}

/// The remote base URL comes from --endpoint or the environment.
pub fn resolve_endpoint(flag: Option<String>) -> Result<String> {
    let base = match flag {
        Some(url) => url,
        None => std::env::var(ENDPOINT_ENV)
            .with_context(|| format!("pass --endpoint or set {}", ENDPOINT_ENV))?,
    };
    Ok(base.trim_end_matches('/').to_string())
}

/// POST the given listings to {base}/jobs. Returns how many were sent.
pub async fn push_jobs(base: &str, jobs: &[JobListing]) -> Result<usize> {
    if jobs.is_empty() {
        return Ok(0);
    }
    let payload: Vec<JobPayload> = jobs.iter().map(JobPayload::from).collect();
    let url = format!("{}/jobs", base);

    info!("Pushing {} job listings to {}", payload.len(), url);
    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .context("Failed to reach the job sync endpoint")?;
    if !response.status().is_success() {
        bail!("Job push rejected with status {}", response.status());
    }
    Ok(payload.len())
}

/// GET {base}/jobs and return the remote listings.
pub async fn pull_jobs(base: &str) -> Result<Vec<JobPayload>> {
    let url = format!("{}/jobs", base);

    info!("Pulling job listings from {}", url);
    let client = reqwest::Client::new();
    let jobs = client
        .get(&url)
        .send()
        .await
        .context("Failed to reach the job sync endpoint")?
        .error_for_status()
        .context("Job pull rejected")?
        .json::<Vec<JobPayload>>()
        .await
        .context("Failed to decode the job listing response")?;
    Ok(jobs)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_flag_wins_and_is_trimmed() {
        let base = resolve_endpoint(Some("https://api.example.dev/".to_string())).unwrap();
        assert_eq!(base, "https://api.example.dev");
    }

    #[test]
    fn payload_skips_absent_fields() {
        let payload = JobPayload {
            title: "SRE".to_string(),
            company: "Hooli".to_string(),
            location: None,
            url: None,
            notes: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("location"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn payload_round_trips_through_new_job() {
        let payload = JobPayload {
            title: "SRE".to_string(),
            company: "Hooli".to_string(),
            location: Some("NYC".to_string()),
            url: None,
            notes: None,
        };
        let job = NewJob::from(payload.clone());
        assert_eq!(job.title, "SRE");
        assert_eq!(job.location.as_deref(), Some("NYC"));
    }
}
