//! The fixed list of sections a production scan gathers, in order.
//!
//! Broad sections query Google News RSS search; regulator and research
//! sections are site-scoped searches whose source label names the site.
//! Reddit forums are read through their public `.rss` endpoints.

use url::form_urlencoded;

use horizon_common::{LocaleConfig, ScanConfig};

pub const GOOGLE_NEWS_SEARCH: &str = "https://news.google.com/rss/search";
pub const AIID_LIMIT: usize = 25;

const REDDIT_MAX_ITEMS: usize = 25;
const BROAD_MAX_ITEMS: usize = 80;
const SITE_MAX_ITEMS: usize = 40;

const SUBREDDITS: &[&str] = &["netsec", "artificial", "openai"];

const BROAD_QUERIES: &[(&str, &str)] = &[
    (
        "harms",
        "AI (harm OR incident OR abuse OR scam OR fraud OR voice cloning OR deepfake OR nudify OR jailbreak OR prompt injection) -stock",
    ),
    (
        "models",
        "(model card OR system card OR technical report OR safety report OR evals OR benchmark) AND (AI OR frontier model) -price",
    ),
    (
        "watchdogs",
        "(AI Safety Institute OR AISI OR Ofcom OR ICO OR CMA) AND (AI OR foundation model)",
    ),
];

const UK_REGULATORS: &[(&str, &str)] = &[
    ("ICO (site)", "site:ico.org.uk (AI OR Grok OR agentic OR deepfake OR synthetic)"),
    ("Ofcom (site)", "site:ofcom.org.uk (AI OR deepfake OR synthetic OR online safety)"),
    ("CMA (site)", "site:gov.uk/cma (AI OR foundation model)"),
];

const UK_RESEARCH_POLICY: &[(&str, &str)] = &[
    ("CETaS (site)", "site:cetas.turing.ac.uk (AI OR deepfake OR disinformation OR cybersecurity OR agents)"),
    ("Ada Lovelace (site)", "site:adalovelaceinstitute.org (AI OR agents OR harms OR governance)"),
    ("NSSIF (site)", "site:nssif.gov.uk (AI OR disinformation OR privacy OR security)"),
    ("OII (site)", "site:oii.ox.ac.uk (AI OR ChatGPT OR online safety OR inequality)"),
    ("Oxford Ethics in AI (site)", "site:oxford-aiethics.ox.ac.uk (AI OR elections OR rights OR agency)"),
    ("IWF (site)", "site:iwf.org.uk (AI OR nudification OR child sexual abuse OR CSAM)"),
    ("UCL Dawes (site)", "site:ucl.ac.uk/engineering/future-crime (AI OR future crime OR fraud OR deepfake)"),
];

/// One feed to read. `source_label`, when set, replaces each record's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub url: String,
    pub max_items: usize,
    pub source_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRequest {
    Aiid { limit: usize },
    Feeds(Vec<FeedRequest>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPlan {
    pub key: String,
    pub request: SectionRequest,
    /// Cap on the section's total, applied after all its feeds are read.
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePlan {
    pub sections: Vec<SectionPlan>,
}

/// Google News RSS search URL for `query` in the given locale.
pub fn google_news_search_url(query: &str, locale: &LocaleConfig) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", query)
        .append_pair("hl", &locale.hl)
        .append_pair("gl", &locale.gl)
        .append_pair("ceid", &locale.ceid)
        .finish();
    format!("{GOOGLE_NEWS_SEARCH}?{params}")
}

pub fn reddit_feed_url(subreddit: &str) -> String {
    format!("https://www.reddit.com/r/{subreddit}/new/.rss")
}

fn site_scoped(queries: &[(&str, &str)], locale: &LocaleConfig) -> SectionRequest {
    SectionRequest::Feeds(
        queries
            .iter()
            .map(|(label, query)| FeedRequest {
                url: google_news_search_url(query, locale),
                max_items: SITE_MAX_ITEMS,
                source_label: Some(label.to_string()),
            })
            .collect(),
    )
}

impl SourcePlan {
    /// aiid, forums, harms, models, watchdogs, uk_regulators, uk_research_policy.
    pub fn standard(config: &ScanConfig) -> Self {
        let locale = &config.locale;
        let mut requests: Vec<(String, SectionRequest)> = Vec::new();

        requests.push(("aiid".to_string(), SectionRequest::Aiid { limit: AIID_LIMIT }));
        requests.push((
            "forums".to_string(),
            SectionRequest::Feeds(
                SUBREDDITS
                    .iter()
                    .map(|sub| FeedRequest {
                        url: reddit_feed_url(sub),
                        max_items: REDDIT_MAX_ITEMS,
                        source_label: Some(format!("Reddit/{sub}")),
                    })
                    .collect(),
            ),
        ));
        for (key, query) in BROAD_QUERIES {
            requests.push((
                key.to_string(),
                SectionRequest::Feeds(vec![FeedRequest {
                    url: google_news_search_url(query, locale),
                    max_items: BROAD_MAX_ITEMS,
                    source_label: None,
                }]),
            ));
        }
        requests.push(("uk_regulators".to_string(), site_scoped(UK_REGULATORS, locale)));
        requests.push((
            "uk_research_policy".to_string(),
            site_scoped(UK_RESEARCH_POLICY, locale),
        ));

        let sections = requests
            .into_iter()
            .map(|(key, request)| SectionPlan {
                max_items: config.section_cap(&key),
                key,
                request,
            })
            .collect();

        Self { sections }
    }

    pub fn keys(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.key.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_sections_in_order() {
        let plan = SourcePlan::standard(&ScanConfig::default());
        assert_eq!(
            plan.keys(),
            vec![
                "aiid",
                "forums",
                "harms",
                "models",
                "watchdogs",
                "uk_regulators",
                "uk_research_policy"
            ]
        );
    }

    #[test]
    fn search_url_encodes_query_and_locale() {
        let url = google_news_search_url("site:ico.org.uk (AI OR deepfake)", &LocaleConfig::default());
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=site%3Aico.org.uk+%28AI+OR+deepfake%29&hl=en-GB&gl=GB&ceid=GB%3Aen"
        );
    }

    #[test]
    fn forums_relabel_by_subreddit() {
        let plan = SourcePlan::standard(&ScanConfig::default());
        let forums = &plan.sections[1];
        let SectionRequest::Feeds(feeds) = &forums.request else {
            panic!("forums should be feed requests");
        };
        assert_eq!(feeds.len(), 3);
        assert_eq!(feeds[0].url, "https://www.reddit.com/r/netsec/new/.rss");
        assert_eq!(feeds[0].source_label.as_deref(), Some("Reddit/netsec"));
        assert_eq!(forums.max_items, Some(75));
    }

    #[test]
    fn site_scoped_sections_carry_labels() {
        let plan = SourcePlan::standard(&ScanConfig::default());
        let research = plan.sections.last().unwrap();
        let SectionRequest::Feeds(feeds) = &research.request else {
            panic!("research should be feed requests");
        };
        assert_eq!(feeds.len(), 7);
        assert!(feeds.iter().all(|f| f.max_items == 40));
        assert_eq!(feeds[5].source_label.as_deref(), Some("IWF (site)"));
    }

    #[test]
    fn locale_flows_into_urls() {
        let mut config = ScanConfig::default();
        config.locale = LocaleConfig {
            hl: "en-US".to_string(),
            gl: "US".to_string(),
            ceid: "US:en".to_string(),
        };
        let plan = SourcePlan::standard(&config);
        let SectionRequest::Feeds(feeds) = &plan.sections[2].request else {
            panic!("harms should be feed requests");
        };
        assert!(feeds[0].url.ends_with("&hl=en-US&gl=US&ceid=US%3Aen"));
    }
}
