use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ads are always created paused; activation is a manual step in Google Ads.
pub const AD_STATUS_PAUSED: &str = "PAUSED";

/// Raw `POST /create-ad` body.
///
/// Fields stay as loose JSON so the validator can report exactly what was
/// wrong with them instead of failing on deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdPayload {
    #[serde(default)]
    pub customer_id: Option<Value>,
    #[serde(default)]
    pub ad_group_id: Option<Value>,
    #[serde(default)]
    pub headlines: Option<Value>,
    #[serde(default)]
    pub descriptions: Option<Value>,
    #[serde(default)]
    pub final_url: Option<Value>,
    /// Accepted for compatibility with existing callers, never used.
    #[serde(default)]
    pub api_key: Option<Value>,
}

/// An ad request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdCreationRequest {
    pub customer_id: String,
    pub ad_group_id: String,
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub final_url: String,
}

impl AdCreationRequest {
    /// Customer id as Google Ads expects it in URLs and resource names.
    pub fn normalized_customer_id(&self) -> String {
        strip_dashes(&self.customer_id)
    }

    /// `customers/{customerId}/adGroups/{adGroupId}`
    pub fn ad_group_resource_name(&self) -> String {
        format!(
            "customers/{}/adGroups/{}",
            self.normalized_customer_id(),
            self.ad_group_id.trim()
        )
    }

    /// Builds the create operation sent to Google Ads.
    pub fn to_operation(&self) -> AdGroupAdOperation {
        AdGroupAdOperation {
            create: AdGroupAd {
                ad_group: self.ad_group_resource_name(),
                status: AD_STATUS_PAUSED.to_string(),
                ad: Ad {
                    final_urls: vec![self.final_url.clone()],
                    responsive_search_ad: ResponsiveSearchAd {
                        headlines: text_assets(&self.headlines),
                        descriptions: text_assets(&self.descriptions),
                    },
                },
            },
        }
    }
}

/// Removes the dashes of the `123-456-7890` display format.
pub fn strip_dashes(id: &str) -> String {
    id.trim().chars().filter(|c| *c != '-').collect()
}

/// Body of `customers/{id}/adGroupAds:mutate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateAdGroupAdsRequest {
    pub operations: Vec<AdGroupAdOperation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdGroupAdOperation {
    pub create: AdGroupAd,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupAd {
    pub ad_group: String,
    pub status: String,
    pub ad: Ad,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub final_urls: Vec<String>,
    pub responsive_search_ad: ResponsiveSearchAd,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponsiveSearchAd {
    pub headlines: Vec<AdTextAsset>,
    pub descriptions: Vec<AdTextAsset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdTextAsset {
    pub text: String,
}

fn text_assets(texts: &[String]) -> Vec<AdTextAsset> {
    texts
        .iter()
        .map(|text| AdTextAsset { text: text.clone() })
        .collect()
}

/// Successful `POST /create-ad` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCreationResult {
    pub success: bool,
    pub resource_name: String,
    pub message: String,
    pub details: AdCreationDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCreationDetails {
    pub customer_id: String,
    pub ad_group_id: String,
    pub headlines_count: usize,
    pub descriptions_count: usize,
    pub status: String,
}

impl AdCreationResult {
    pub fn new(request: &AdCreationRequest, resource_name: String) -> Self {
        Self {
            success: true,
            resource_name,
            message: "Ad created successfully in Google Ads (paused for review)".to_string(),
            details: AdCreationDetails {
                customer_id: request.customer_id.clone(),
                ad_group_id: request.ad_group_id.clone(),
                headlines_count: request.headlines.len(),
                descriptions_count: request.descriptions.len(),
                status: AD_STATUS_PAUSED.to_string(),
            },
        }
    }
}
