//! Placeholder extraction producer.
//!
//! Stands in for a real PDF text-extraction pipeline: every new document
//! gets 8–12 snippets of boilerplate legal text spread across pages 1–5.
//! The lifecycle service treats this purely as a data source.

use rand::Rng;
use uuid::Uuid;

use crate::models::Extraction;

const LEGAL_PHRASES: [&str; 10] = [
    "The parties hereby agree to the following terms and conditions:",
    "In accordance with Section 2.1 of the Agreement,",
    "Subject to applicable laws and regulations,",
    "The undersigned parties mutually agree that,",
    "Notwithstanding anything to the contrary herein,",
    "This Agreement shall be governed by and construed in accordance with,",
    "For the avoidance of doubt,",
    "Without limiting the generality of the foregoing,",
    "The parties acknowledge and agree that,",
    "In witness whereof, the parties have executed this Agreement as of",
];

/// Output contract of the producer.
#[derive(Debug, Clone)]
pub struct GeneratedExtractions {
    pub document_id: Uuid,
    /// 8–12 items, page numbers in 1–5, sorted ascending by page.
    pub extractions: Vec<Extraction>,
}

/// Generate placeholder extractions for a document.
pub fn generate(document_id: &Uuid) -> GeneratedExtractions {
    let mut rng = rand::thread_rng();
    let count: usize = rng.gen_range(8..=12);

    let mut extractions: Vec<Extraction> = (0..count)
        .map(|i| Extraction {
            id: Uuid::new_v4().to_string(),
            text: LEGAL_PHRASES[rng.gen_range(0..LEGAL_PHRASES.len())].to_string(),
            page_number: (i % 5) as i64 + 1,
        })
        .collect();

    // Stable sort: items on the same page keep their generation order.
    extractions.sort_by_key(|e| e.page_number);

    GeneratedExtractions {
        document_id: *document_id,
        extractions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_within_contract_range() {
        for _ in 0..50 {
            let generated = generate(&Uuid::new_v4());
            let n = generated.extractions.len();
            assert!((8..=12).contains(&n), "unexpected count {n}");
        }
    }

    #[test]
    fn page_numbers_are_one_through_five() {
        for _ in 0..20 {
            let generated = generate(&Uuid::new_v4());
            assert!(generated
                .extractions
                .iter()
                .all(|e| (1..=5).contains(&e.page_number)));
        }
    }

    #[test]
    fn result_is_sorted_by_page_number() {
        for _ in 0..20 {
            let generated = generate(&Uuid::new_v4());
            let pages: Vec<i64> = generated.extractions.iter().map(|e| e.page_number).collect();
            let mut sorted = pages.clone();
            sorted.sort();
            assert_eq!(pages, sorted);
        }
    }

    #[test]
    fn text_is_drawn_from_the_phrase_set() {
        let generated = generate(&Uuid::new_v4());
        assert!(generated
            .extractions
            .iter()
            .all(|e| LEGAL_PHRASES.contains(&e.text.as_str())));
    }

    #[test]
    fn item_ids_are_unique() {
        let generated = generate(&Uuid::new_v4());
        let mut ids: Vec<&str> = generated.extractions.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), generated.extractions.len());
    }
}
