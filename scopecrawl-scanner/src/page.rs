use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// A fetched page as handed to the page handler.
///
/// HTML bodies are parsed once, at construction, for their `<base href>`
/// and anchor hrefs.
#[derive(Debug, Clone)]
pub struct Page {
    request_url: Url,
    loaded_url: Url,
    status: u16,
    content_type: Option<String>,
    body: String,
    base_url: Url,
    anchor_hrefs: Vec<String>,
}

impl Page {
    pub fn new(
        request_url: Url,
        loaded_url: Url,
        status: u16,
        content_type: Option<String>,
        body: String,
    ) -> Self {
        let mut page = Self {
            base_url: loaded_url.clone(),
            request_url,
            loaded_url,
            status,
            content_type,
            body,
            anchor_hrefs: Vec::new(),
        };
        if page.is_html() {
            let (base_url, anchor_hrefs) = extract_links(&page.body, &page.loaded_url);
            page.base_url = base_url;
            page.anchor_hrefs = anchor_hrefs;
        }
        page
    }

    /// The URL the request was scheduled for.
    pub fn request_url(&self) -> &Url {
        &self.request_url
    }

    /// The URL the response came from, after redirects.
    pub fn loaded_url(&self) -> &Url {
        &self.loaded_url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.contains("text/html") || ct.contains("application/xhtml+xml")
            })
            .unwrap_or(false)
    }

    /// Base URL relative links resolve against: `<base href>` if present,
    /// otherwise the loaded URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Raw `href` values of every anchor on the page, in document order.
    pub fn anchor_hrefs(&self) -> &[String] {
        &self.anchor_hrefs
    }
}

fn extract_links(body: &str, loaded_url: &Url) -> (Url, Vec<String>) {
    let document = Html::parse_document(body);

    let base_url = Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| loaded_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| loaded_url.clone());

    let anchor_hrefs = match Selector::parse("a[href]") {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    };

    (base_url, anchor_hrefs)
}

/// Collects the links a page handler asks the engine to follow.
pub struct LinkEnqueuer<'a> {
    page: &'a Page,
    accepted: Vec<Url>,
}

impl<'a> LinkEnqueuer<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self {
            page,
            accepted: Vec::new(),
        }
    }

    /// Harvest the page's anchors, resolve them and keep every candidate for
    /// which `filter` returns a URL. Returns the number of newly kept links.
    ///
    /// Only http(s) candidates are proposed to `filter`.
    pub fn enqueue_links<F>(&mut self, filter: F) -> usize
    where
        F: Fn(&Url) -> Option<Url>,
    {
        let base = self.page.base_url();
        let mut added = 0;
        for href in self.page.anchor_hrefs() {
            let Ok(candidate) = base.join(href.trim()) else {
                debug!("Engine skipped unresolvable href {:?}", href);
                continue;
            };
            if !matches!(candidate.scheme(), "http" | "https") {
                debug!("Engine skipped non-http href {:?}", href);
                continue;
            }
            if let Some(url) = filter(&candidate)
                && !self.accepted.contains(&url)
            {
                self.accepted.push(url);
                added += 1;
            }
        }
        added
    }

    pub fn accepted(&self) -> &[Url] {
        &self.accepted
    }

    pub fn into_accepted(self) -> Vec<Url> {
        self.accepted
    }
}
