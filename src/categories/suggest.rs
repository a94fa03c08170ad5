use std::collections::BTreeSet;

/// Keywords commonly associated with category name patterns.
const CATEGORY_SUGGESTIONS: &[(&str, &[&str])] = &[
    // Programming / tech
    ("tech", &["programming", "software", "code", "developer", "api", "framework", "technical"]),
    ("programming", &["code", "software", "developer", "function", "class", "module", "programming"]),
    ("code", &["programming", "software", "script", "function", "library", "code"]),
    ("software", &["programming", "code", "application", "developer", "software"]),
    ("data", &["data", "database", "sql", "csv", "json", "analytics", "dataset"]),
    ("web", &["html", "css", "javascript", "web", "http", "api", "frontend"]),
    ("security", &["security", "encryption", "vulnerability", "authentication", "password"]),
    ("machine", &["machine", "learning", "ml", "ai", "model", "neural", "training"]),
    ("ai", &["artificial", "intelligence", "ai", "ml", "model", "neural", "gpt"]),
    // Design
    ("design", &["design", "figma", "sketch", "ui", "ux", "mockup", "wireframe"]),
    ("ui", &["ui", "interface", "design", "button", "component", "layout"]),
    ("graphic", &["graphic", "design", "photoshop", "illustrator", "logo", "visual"]),
    // Finance / business
    ("invoice", &["invoice", "receipt", "bill", "payment", "amount", "total", "due"]),
    ("receipt", &["receipt", "invoice", "purchase", "payment", "transaction", "total"]),
    ("bill", &["bill", "invoice", "payment", "amount", "due", "utility", "statement"]),
    ("finance", &["invoice", "receipt", "bank", "payment", "transaction", "account", "finance"]),
    ("tax", &["tax", "return", "deduction", "income", "irs", "w2", "1099"]),
    ("bank", &["bank", "statement", "account", "transaction", "balance", "transfer"]),
    ("expense", &["expense", "receipt", "reimbursement", "cost", "spending"]),
    // Work
    ("work", &["project", "report", "meeting", "client", "business", "presentation", "work"]),
    ("project", &["project", "deliverable", "milestone", "task", "client", "proposal"]),
    ("meeting", &["meeting", "agenda", "minutes", "notes", "attendee", "action"]),
    ("report", &["report", "summary", "analysis", "quarterly", "annual", "status"]),
    ("presentation", &["presentation", "slide", "deck", "powerpoint", "keynote"]),
    ("contract", &["contract", "agreement", "terms", "signature", "legal", "binding"]),
    // Personal
    ("personal", &["family", "vacation", "photo", "home", "private", "personal"]),
    ("vacation", &["travel", "trip", "holiday", "photo", "destination", "vacation"]),
    ("health", &["health", "medical", "doctor", "prescription", "insurance", "wellness"]),
    ("medical", &["medical", "health", "doctor", "prescription", "diagnosis", "treatment"]),
    ("insurance", &["insurance", "policy", "claim", "coverage", "premium", "benefit"]),
    // Academic / research
    ("paper", &["paper", "research", "study", "abstract", "doi", "journal", "arxiv"]),
    ("research", &["research", "study", "paper", "analysis", "data", "experiment"]),
    ("academic", &["paper", "thesis", "dissertation", "journal", "publication", "academic"]),
    ("thesis", &["thesis", "dissertation", "research", "chapter", "defense", "advisor"]),
    ("journal", &["journal", "paper", "publication", "peer", "review", "article"]),
    ("study", &["study", "research", "analysis", "findings", "methodology", "results"]),
    // Books / reading
    ("book", &["chapter", "author", "isbn", "publisher", "edition", "book"]),
    ("fiction", &["novel", "story", "fantasy", "romance", "mystery", "thriller", "fiction"]),
    ("nonfiction", &["guide", "manual", "reference", "handbook", "tutorial", "nonfiction"]),
    ("novel", &["novel", "fiction", "story", "chapter", "author", "narrative"]),
    ("textbook", &["textbook", "education", "chapter", "exercise", "course", "learning"]),
    ("manual", &["manual", "guide", "instruction", "reference", "howto", "documentation"]),
    ("cookbook", &["recipe", "cooking", "food", "ingredient", "cuisine", "chef"]),
    ("history", &["history", "historical", "war", "century", "civilization", "era"]),
    // Media
    ("photo", &["photo", "image", "picture", "camera", "shot", "photography"]),
    ("image", &["image", "photo", "picture", "graphic", "visual", "png", "jpg"]),
    ("video", &["video", "clip", "movie", "recording", "footage", "mp4"]),
    ("movie", &["movie", "film", "cinema", "director", "actor", "scene"]),
    ("music", &["music", "song", "audio", "track", "album", "artist"]),
    ("podcast", &["podcast", "episode", "audio", "interview", "host", "series"]),
    ("audio", &["audio", "sound", "music", "recording", "mp3", "wav"]),
    // Legal
    ("legal", &["legal", "contract", "agreement", "law", "court", "attorney"]),
    ("agreement", &["agreement", "contract", "terms", "parties", "signed", "binding"]),
    ("license", &["license", "permit", "agreement", "terms", "rights", "usage"]),
    // Education
    ("education", &["education", "course", "learning", "student", "teacher", "curriculum"]),
    ("course", &["course", "lesson", "module", "assignment", "grade", "syllabus"]),
    ("tutorial", &["tutorial", "guide", "howto", "learn", "step", "instruction"]),
    ("certificate", &["certificate", "certification", "credential", "completion", "award"]),
    // Communication
    ("email", &["email", "message", "inbox", "reply", "forward", "attachment"]),
    ("letter", &["letter", "correspondence", "dear", "sincerely", "regards"]),
    ("newsletter", &["newsletter", "update", "subscribe", "edition", "weekly"]),
    // Real estate
    ("property", &["property", "real", "estate", "deed", "title", "ownership"]),
    ("lease", &["lease", "rent", "tenant", "landlord", "agreement", "term"]),
    ("mortgage", &["mortgage", "loan", "interest", "payment", "principal", "amortization"]),
    // Archives
    ("archive", &["archive", "backup", "old", "historical", "legacy", "storage"]),
    ("backup", &["backup", "archive", "copy", "restore", "recovery", "snapshot"]),
];

/// Category name patterns mapped to their likely parent category.
/// Checked in order; the first pattern contained in the name wins.
const PARENT_INFERENCE: &[(&str, &str)] = &[
    // Book subcategories
    ("book", "Books"),
    ("fiction", "Books"),
    ("nonfiction", "Books"),
    ("novel", "Books"),
    ("textbook", "Books"),
    ("manual", "Books"),
    ("cookbook", "Books"),
    ("biography", "Books"),
    // Document subcategories
    ("invoice", "Documents"),
    ("receipt", "Documents"),
    ("bill", "Documents"),
    ("contract", "Documents"),
    ("agreement", "Documents"),
    ("report", "Documents"),
    ("letter", "Documents"),
    ("memo", "Documents"),
    ("certificate", "Documents"),
    ("license", "Documents"),
    // Image subcategories
    ("screenshot", "Screenshots"),
    ("photo", "Images"),
    ("picture", "Images"),
    ("graphic", "Images"),
    ("scan", "Images"),
    // Video subcategories
    ("movie", "Videos"),
    ("clip", "Videos"),
    // Audio subcategories
    ("music", "Audio"),
    ("song", "Audio"),
    ("podcast", "Audio"),
    ("recording", "Audio"),
    // Paper subcategories
    ("research", "Papers"),
    ("study", "Papers"),
    ("journal", "Papers"),
    ("thesis", "Papers"),
    ("dissertation", "Papers"),
    ("academic", "Papers"),
    // Code subcategories
    ("script", "Code"),
    ("program", "Code"),
    ("source", "Code"),
    // Data subcategories
    ("dataset", "Data"),
    ("database", "Data"),
    ("spreadsheet", "Data"),
    ("csv", "Data"),
    ("json", "Data"),
];

/// Maximum keywords offered per suggestion.
const MAX_KEYWORDS: usize = 10;

/// Suggested starting point for a new category.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionResult {
    pub parent: Option<String>,
    pub keywords: Vec<String>,
    /// 0.0 when nothing matched, up to 0.9 for several matched patterns
    pub confidence: f32,
}

impl SuggestionResult {
    pub fn has_suggestions(&self) -> bool {
        self.parent.is_some() || !self.keywords.is_empty()
    }
}

/// Suggest a parent category and starter keywords for a category name.
///
/// Purely dictionary-driven and deterministic; used by the CLI to
/// pre-fill rules when the user creates a category.
pub fn suggest_rules(category_name: &str) -> SuggestionResult {
    let name_lower = category_name.to_lowercase();
    let words: Vec<&str> = name_lower.split_whitespace().collect();

    let parent = PARENT_INFERENCE
        .iter()
        .find(|(pattern, _)| name_lower.contains(pattern))
        .map(|(_, parent)| parent.to_string());

    let mut keywords: BTreeSet<&str> = BTreeSet::new();
    let mut matches_found = 0;

    for word in &words {
        if let Some((_, suggested)) = CATEGORY_SUGGESTIONS.iter().find(|(p, _)| p == word) {
            keywords.extend(suggested.iter());
            matches_found += 1;
        }
    }

    // Substring matches beyond the exact words ("tech books" -> "book")
    for (pattern, suggested) in CATEGORY_SUGGESTIONS {
        if name_lower.contains(pattern) && !words.contains(pattern) {
            keywords.extend(suggested.iter());
            matches_found += 1;
        }
    }

    let confidence = match matches_found {
        0 => 0.0,
        1 => 0.6,
        2 => 0.8,
        _ => 0.9,
    };

    let keywords: Vec<String> = keywords
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect();

    SuggestionResult {
        parent,
        keywords,
        confidence,
    }
}
