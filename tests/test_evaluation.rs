use std::io::Cursor;

use hmmtag::{dataset, Error, Evaluation, ProbabilityModel, Quark, ReaderConfig, TagField, Tagger, Trainer};

const TRAIN: &str = "1\tthe\tthe\tDET\tDT\t_\n\
                     2\tdog\tdog\tNOUN\tNN\t_\n\
                     3\tbarks\tbark\tVERB\tVBZ\t_\n\
                     \n\
                     1\ta\ta\tDET\tDT\t_\n\
                     2\tcat\tcat\tNOUN\tNN\t_\n\
                     3\tsleeps\tsleep\tVERB\tVBZ\t_\n\
                     \n";

const GOLD: &str = "1\tthe\tthe\tDET\tDT\t_\n\
                    2\tcat\tcat\tNOUN\tNN\t_\n\
                    3\tbarks\tbark\tVERB\tVBZ\t_\n\
                    \n\
                    1\ta\ta\tDET\tDT\t_\n\
                    2\tbird\tbird\tNOUN\tNN\t_\n\
                    3\tsings\tsing\tVERB\tVBZ\t_\n";

#[test]
fn train_tag_evaluate() {
    let config = ReaderConfig::new(TagField::Coarse);
    let train = dataset::read_sentences(Cursor::new(TRAIN), &config).unwrap();
    let mut trainer = Trainer::new(TagField::Coarse);
    trainer.train(&train);
    let model = trainer.into_model();

    let gold = dataset::read_sentences(Cursor::new(GOLD), &config).unwrap();
    let tagged = Tagger::new(&model).tag_sentences(&gold);

    let mut buf = Vec::new();
    dataset::write_tagged(&mut buf, &tagged).unwrap();
    let predicted = dataset::read_tagged(Cursor::new(buf)).unwrap();
    assert_eq!(predicted, tagged);

    let gold_tags: Vec<Vec<&str>> = gold
        .iter()
        .map(|s| s.tokens.iter().map(|t| t.tag(TagField::Coarse).unwrap()).collect())
        .collect();
    let predicted_tags: Vec<Vec<&str>> = predicted
        .iter()
        .map(|s| s.iter().map(|(_, t)| t.as_str()).collect())
        .collect();

    let mut evaluation = Evaluation::new(model.tags());
    evaluation.build(&gold_tags, &predicted_tags).unwrap();
    assert_eq!(evaluation.total(), 6);
    // every tag was seen twice, so unknown words fall back to the last one, VERB
    assert_eq!(model.most_frequent_tag(), Some("VERB"));
    assert_eq!(predicted_tags[0], ["DET", "NOUN", "VERB"]);
    assert_eq!(predicted_tags[1], ["DET", "VERB", "VERB"]);
    assert_eq!(evaluation.count("NOUN", "VERB"), 1);
    assert!((evaluation.overall_accuracy() - 5.0 / 6.0).abs() < 1e-12);
    assert!((evaluation.sequence_accuracy() - 0.5).abs() < 1e-12);
    let report = evaluation.to_string();
    assert!(report.contains("Overall Accuracy: 0.8333"));
}

#[test]
fn structural_mismatch_is_fatal() {
    let tags: Quark = ["NOUN", "VERB"].into_iter().collect();
    let mut evaluation = Evaluation::new(&tags);
    let gold = vec![vec!["NOUN", "VERB"], vec!["NOUN"]];
    let predicted = vec![vec!["NOUN", "VERB"]];
    match evaluation.build(&gold, &predicted) {
        Err(Error::LengthMismatch { what, expected, actual }) => {
            assert_eq!((what, expected, actual), ("sentence", 2, 1));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn untagged_gold_rows_are_left_out() {
    let config = ReaderConfig::new(TagField::Coarse);
    let train = dataset::read_sentences(Cursor::new("1\tdog\tdog\tNOUN\tNN\t_\n2\truns\trun\tVERB\tVBZ\t_\n"), &config).unwrap();
    let mut trainer = Trainer::new(TagField::Coarse);
    trainer.train(&train);
    let model = trainer.into_model();

    let gold = dataset::read_sentences(Cursor::new("1\tdog\tdog\tNOUN\tNN\t_\n2\truns\n"), &config).unwrap();
    assert_eq!(gold[0].len(), 2);
    let predicted = Tagger::new(&model).tag_sentences(&gold);

    let gold_tags: Vec<Vec<Option<&str>>> = gold
        .iter()
        .map(|s| s.tokens.iter().map(|t| t.tag(TagField::Coarse)).collect())
        .collect();
    let predicted_tags: Vec<Vec<&str>> = predicted
        .iter()
        .map(|s| s.iter().map(|(_, t)| t.as_str()).collect())
        .collect();

    let mut evaluation = Evaluation::new(model.tags());
    evaluation.build_partial(&gold_tags, &predicted_tags).unwrap();
    assert_eq!(evaluation.total(), 1);
    assert_eq!(evaluation.count("NOUN", "NOUN"), 1);
    assert!((evaluation.overall_accuracy() - 1.0).abs() < 1e-12);
}

#[test]
fn failed_build_leaves_counts_untouched() {
    let tags: Quark = ["NOUN", "VERB"].into_iter().collect();
    let mut evaluation = Evaluation::new(&tags);
    let gold = vec![vec!["NOUN", "VERB"], vec!["NOUN", ""]];
    let predicted = vec![vec!["NOUN", "VERB"], vec!["NOUN", "VERB"]];
    assert!(matches!(evaluation.build(&gold, &predicted), Err(Error::UnknownTag(t)) if t.is_empty()));
    assert_eq!(evaluation.total(), 0);
    assert_eq!(evaluation.sequence_accuracy(), 0.0);
}
