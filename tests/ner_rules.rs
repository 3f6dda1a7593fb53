use legal_lens::nlp::{Ner, RuleNer};

#[test]
fn example_sentence_yields_org_and_date() {
    let entities = RuleNer::new()
        .extract("Acme Corp signed on January 5.")
        .unwrap();
    let texts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
    assert!(texts.contains(&"Acme Corp"), "{entities:?}");
    assert!(texts.contains(&"January 5"), "{entities:?}");
    assert!(entities.iter().all(|e| !e.label.is_empty()));
}

#[test]
fn empty_text_has_no_entities() {
    assert!(RuleNer::new().extract("").unwrap().is_empty());
    assert!(RuleNer::new().extract("   \n ").unwrap().is_empty());
}

#[test]
fn extraction_is_deterministic() {
    let text = "This Agreement is made on 5th day of June, 2023 between Initech LLC and \
                Mr. Peter Gibbons for USD $12,000 under the Fair Labor Standards Act of 1938.";
    let first = RuleNer::new().extract(text).unwrap();
    let second = RuleNer::new().extract(text).unwrap();
    assert_eq!(first, second);
    let labels: Vec<&str> = first.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["DATE", "ORG", "PERSON", "MONEY", "LAW"]);
}

#[test]
fn offsets_point_back_into_the_text() {
    let text = "Payment of 3.5% interest is owed to Umbrella Holdings from 2024-01-31.";
    for entity in RuleNer::new().extract(text).unwrap() {
        assert_eq!(&text[entity.start..entity.end], entity.text);
    }
}
