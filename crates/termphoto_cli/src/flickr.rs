//! Minimal client for the public photo listing of a Flickr user.

use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;

pub const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest/";
const PUBLIC_PHOTOS_METHOD: &str = "flickr.people.getPublicPhotos";

/// Largest page the listing endpoint accepts.
pub const MAX_PER_PAGE: u16 = 500;

#[derive(Debug, thiserror::Error)]
pub enum FlickrError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("flickr returned an error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
pub struct PhotoGroup {
    #[serde(default)]
    pub photos: Option<Photos>,
    pub stat: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Photos {
    pub page: u32,
    pub pages: u32,
    pub perpage: u32,
    // Flickr sends this one as either a string or a number.
    pub total: serde_json::Value,
    #[serde(default)]
    pub photo: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub struct Photo {
    pub id: String,
    pub owner: String,
    pub secret: String,
    pub server: String,
    pub farm: u32,
    #[serde(default)]
    pub title: String,
}

impl Photo {
    /// Static URL of the medium-size JPEG for this photo.
    pub fn image_url(&self) -> String {
        format!(
            "https://farm{}.staticflickr.com/{}/{}_{}.jpg",
            self.farm, self.server, self.id, self.secret
        )
    }
}

/// Decode a listing body, turning a non-`ok` status into [`FlickrError::Api`].
pub fn parse_listing(body: &str) -> Result<Photos, FlickrError> {
    let group: PhotoGroup = serde_json::from_str(body)?;
    if group.stat != "ok" {
        let message = group.message.unwrap_or_else(|| format!("status {}", group.stat));
        return Err(FlickrError::Api(message));
    }

    group.photos.ok_or_else(|| FlickrError::Api("response has no photo listing".to_owned()))
}

pub struct FlickrClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl FlickrClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(http, api_key, REST_ENDPOINT)
    }

    /// Talk to a REST endpoint other than api.flickr.com.
    pub fn with_endpoint(
        http: Client,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self { http, api_key: api_key.into(), endpoint: endpoint.into() }
    }

    /// Image URLs for the first page of `user_id`'s public photos.
    pub fn public_photo_urls(
        &self,
        user_id: &str,
        per_page: u16,
    ) -> Result<Vec<String>, FlickrError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        debug!("listing public photos of {user_id}");

        let body = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("method", PUBLIC_PHOTOS_METHOD),
                ("api_key", self.api_key.as_str()),
                ("user_id", user_id),
                ("per_page", per_page.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        let listing = parse_listing(&body)?;
        info!(
            "page {}/{} of {user_id}: {} photos ({} per page, {} total)",
            listing.page,
            listing.pages,
            listing.photo.len(),
            listing.perpage,
            listing.total
        );

        let urls = listing
            .photo
            .iter()
            .map(|photo| {
                debug!("{} by {}: {:?}", photo.id, photo.owner, photo.title);
                photo.image_url()
            })
            .collect();
        Ok(urls)
    }
}
