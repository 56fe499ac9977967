//! Research-domain taxonomy and keyword classifier.
//!
//! DESIGN
//! ======
//! Publications and free-text queries are tagged against a fixed taxonomy of
//! research domains. Classification is plain keyword matching over the
//! lowercased text; a text that matches nothing is tagged `Other`.

/// Fixed research-domain taxonomy. Order is significant: classification
/// results preserve it.
pub const RESEARCH_DOMAINS: [&str; 20] = [
    "Artificial Intelligence",
    "Machine Learning",
    "Computer Vision",
    "Natural Language Processing",
    "Data Science",
    "Robotics",
    "Internet of Things",
    "Cybersecurity",
    "Cloud Computing",
    "Big Data",
    "Software Engineering",
    "Web Technologies",
    "Network Security",
    "Embedded Systems",
    "VLSI Design",
    "Power Systems",
    "Control Systems",
    "Signal Processing",
    "Communication Systems",
    "Wireless Networks",
];

/// Keyword triggers per domain, matched as lowercase substrings.
const DOMAIN_KEYWORDS: [(&str, &[&str]); 20] = [
    ("Artificial Intelligence", &["artificial intelligence", "expert system", "knowledge representation"]),
    ("Machine Learning", &["machine learning", "deep learning", "neural network", "reinforcement learning"]),
    ("Computer Vision", &["computer vision", "image processing", "object detection", "image classification"]),
    ("Natural Language Processing", &["natural language", "text mining", "sentiment analysis", "language model"]),
    ("Data Science", &["data science", "data analytics", "data mining", "predictive analytics"]),
    ("Robotics", &["robot", "autonomous vehicle", "drone"]),
    ("Internet of Things", &["internet of things", "iot", "smart home", "smart city"]),
    ("Cybersecurity", &["cybersecurity", "cyber security", "malware", "intrusion detection", "phishing"]),
    ("Cloud Computing", &["cloud computing", "cloud storage", "virtualization", "serverless"]),
    ("Big Data", &["big data", "hadoop", "mapreduce", "data warehouse"]),
    ("Software Engineering", &["software engineering", "software testing", "software architecture", "agile"]),
    ("Web Technologies", &["web application", "web service", "web development", "semantic web"]),
    ("Network Security", &["network security", "cryptography", "encryption", "firewall"]),
    ("Embedded Systems", &["embedded system", "microcontroller", "real-time system", "firmware"]),
    ("VLSI Design", &["vlsi", "integrated circuit", "fpga", "chip design"]),
    ("Power Systems", &["power system", "smart grid", "power electronics", "renewable energy"]),
    ("Control Systems", &["control system", "pid control", "automation", "feedback control"]),
    ("Signal Processing", &["signal processing", "speech processing", "fourier", "wavelet"]),
    ("Communication Systems", &["communication system", "antenna", "modulation", "optical communication"]),
    ("Wireless Networks", &["wireless", "5g", "wifi", "sensor network", "ad hoc network"]),
];

/// Classify one text into research domains. Multi-label; falls back to
/// `Other` when no keyword matches.
#[must_use]
pub fn classify(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let matched: Vec<String> = DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(domain, _)| (*domain).to_owned())
        .collect();

    if matched.is_empty() { vec!["Other".to_owned()] } else { matched }
}

/// Classify a batch of texts, one domain list per input text.
#[must_use]
pub fn classify_batch(texts: &[String]) -> Vec<Vec<String>> {
    texts.iter().map(|text| classify(text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_single_domain() {
        let domains = classify("A survey of deep learning optimizers");
        assert_eq!(domains, vec!["Machine Learning".to_owned()]);
    }

    #[test]
    fn classify_is_multi_label() {
        let domains = classify("Machine learning for intrusion detection in wireless sensor networks");
        assert_eq!(
            domains,
            vec![
                "Machine Learning".to_owned(),
                "Cybersecurity".to_owned(),
                "Wireless Networks".to_owned(),
            ]
        );
    }

    #[test]
    fn classify_is_case_insensitive() {
        let domains = classify("BIG DATA processing with HADOOP");
        assert_eq!(domains, vec!["Big Data".to_owned()]);
    }

    #[test]
    fn classify_falls_back_to_other() {
        assert_eq!(classify("medieval French poetry"), vec!["Other".to_owned()]);
        assert_eq!(classify(""), vec!["Other".to_owned()]);
    }

    #[test]
    fn classify_batch_preserves_input_order() {
        let texts = vec!["cloud computing at scale".to_owned(), "unrelated".to_owned()];
        let result = classify_batch(&texts);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], vec!["Cloud Computing".to_owned()]);
        assert_eq!(result[1], vec!["Other".to_owned()]);
    }

    #[test]
    fn taxonomy_and_keywords_stay_aligned() {
        for (domain, keywords) in &DOMAIN_KEYWORDS {
            assert!(RESEARCH_DOMAINS.contains(domain));
            assert!(!keywords.is_empty());
        }
    }
}
