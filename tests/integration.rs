// tests/integration.rs
//
// End-to-end scenarios named in SPEC_FULL.md §8.

use compgraph::joiners::Joiner;
use compgraph::mappers::Mapper;
use compgraph::sort::{external_sort, SortConfig};
use compgraph::stream::rows_from_vec;
use compgraph::testing::fixtures::{inverted_index_graph, pmi_graph, word_count_graph, yandex_maps_graph};
use compgraph::testing::{assert_rows_eq_multiset, RowBuilder, TestGraph};
use compgraph::value::Value;
use compgraph::{Graph, Row};
use std::collections::HashMap;

fn doc_row(doc_id: i64, text: &str) -> Row {
    let mut row = Row::new();
    row.set("doc_id", doc_id).set("text", text);
    row
}

#[test]
fn word_count_counts_case_and_punctuation_insensitively() -> anyhow::Result<()> {
    let graph = word_count_graph("lines", "text", "count");
    let out = TestGraph::new(graph)
        .with_input(
            "lines",
            vec![
                Row::from_pairs([("text", "hello, HELLO world")]),
                Row::from_pairs([("text", "World!")]),
            ],
        )
        .run()?;

    let expected = vec![
        RowBuilder::new().set("text", "hello").set("count", 2i64).build(),
        RowBuilder::new().set("text", "world").set("count", 2i64).build(),
    ];
    assert_eq!(out, expected, "expected ordered output (final op is a sort): {out:?}");
    Ok(())
}

#[test]
fn tf_idf_matches_the_closed_form_per_word_per_doc() -> anyhow::Result<()> {
    let graph = inverted_index_graph("docs", "doc_id", "text", "tf_idf");
    let docs = vec![
        doc_row(1, "a b a"),
        doc_row(2, "a c"),
        doc_row(3, "b c d"),
    ];
    let out = TestGraph::new(graph).with_input("docs", docs).run()?;

    // Each word appears in at most 3 docs here, so TopN(3) never truncates;
    // every (word, doc) pair with a nonzero count survives.
    let mut by_word: HashMap<String, Vec<(i64, f64)>> = HashMap::new();
    for row in &out {
        let word = row.get("text").unwrap().as_str()?.to_string();
        let doc = row.get("doc_id").unwrap().as_i64()?;
        let score = row.get("tf_idf").unwrap().as_f64()?;
        by_word.entry(word).or_default().push((doc, score));
    }
    for rows in by_word.values() {
        assert!(rows.len() <= 3, "TopN(3) must cap rows per word");
    }

    let idf_in_two_of_three = (3.0f64 / 2.0).ln();
    let a = by_word.get("a").expect("word 'a' present");
    assert_eq!(a.len(), 2);
    let a_doc1 = a.iter().find(|(d, _)| *d == 1).unwrap().1;
    let a_doc2 = a.iter().find(|(d, _)| *d == 2).unwrap().1;
    assert!((a_doc1 - (2.0 / 3.0) * idf_in_two_of_three).abs() < 1e-9);
    assert!((a_doc2 - 0.5 * idf_in_two_of_three).abs() < 1e-9);

    let idf_in_one_of_three = (3.0f64).ln();
    let d = by_word.get("d").expect("word 'd' present");
    assert_eq!(d.len(), 1);
    assert!((d[0].1 - (1.0 / 3.0) * idf_in_one_of_three).abs() < 1e-9);

    Ok(())
}

#[test]
fn pmi_ranks_repeated_long_words_by_document_specificity() -> anyhow::Result<()> {
    let graph = pmi_graph("docs", "doc_id", "text", "pmi");
    let docs = vec![
        doc_row(1, "hello hello world"),
        doc_row(2, "hello sunny sunny world"),
        doc_row(3, "world hello world"),
    ];
    let out = TestGraph::new(graph).with_input("docs", docs).run()?;

    // Each qualifying word occurs twice in its own doc and twice total across
    // the filtered corpus, so pmi = ln(1.0 / (1/3)) = ln(3) for every row.
    assert_eq!(out.len(), 3, "one qualifying word per document: {out:?}");
    let expected_pmi = 3.0f64.ln();
    let mut words_by_doc: HashMap<i64, String> = HashMap::new();
    for row in &out {
        let doc = row.get("doc_id").unwrap().as_i64()?;
        let word = row.get("text").unwrap().as_str()?.to_string();
        let pmi = row.get("pmi").unwrap().as_f64()?;
        assert!((pmi - expected_pmi).abs() < 1e-9, "pmi mismatch for doc {doc}: {pmi}");
        words_by_doc.insert(doc, word);
    }
    assert_eq!(words_by_doc.get(&1).unwrap(), "hello");
    assert_eq!(words_by_doc.get(&2).unwrap(), "sunny");
    assert_eq!(words_by_doc.get(&3).unwrap(), "world");
    Ok(())
}

#[test]
fn yandex_maps_speed_is_the_mean_of_two_traversals_on_one_edge() -> anyhow::Result<()> {
    let graph = yandex_maps_graph("times", "lengths", "enter_time", "leave_time", "edge_id", "start", "end");
    let mut length_row = Row::new();
    length_row
        .set("edge_id", 1i64)
        .set("start", Value::Geo(37.6173, 55.7558))
        .set("end", Value::Geo(30.3141, 59.9386));
    let lengths = vec![length_row];

    let mut traversal1 = Row::new();
    traversal1
        .set("edge_id", 1i64)
        .set("enter_time", "20170101T100000")
        .set("leave_time", "20170101T100010");
    let mut traversal2 = Row::new();
    traversal2
        .set("edge_id", 1i64)
        .set("enter_time", "20170101T100500")
        .set("leave_time", "20170101T100530");
    let times = vec![traversal1, traversal2];

    let out = TestGraph::new(graph)
        .with_input("times", times)
        .with_input("lengths", lengths)
        .run()?;

    assert_eq!(out.len(), 1, "both traversals share a (weekday, hour): {out:?}");
    let mut geo_row = Row::new();
    geo_row
        .set("a", Value::Geo(37.6173, 55.7558))
        .set("b", Value::Geo(30.3141, 59.9386));
    let distance_km = compgraph::mappers::CalculateDistance::new("a", "b", "dist")
        .apply(geo_row)?
        .remove(0)
        .get("dist")
        .unwrap()
        .as_f64()?;
    let speed1 = distance_km / 10.0 * 3600.0;
    let speed2 = distance_km / 30.0 * 3600.0;
    let expected_mean = (speed1 + speed2) / 2.0;
    let actual = out[0].get("speed").unwrap().as_f64()?;
    assert!((actual - expected_mean).abs() < 1e-6, "actual={actual} expected={expected_mean}");
    Ok(())
}

#[test]
fn outer_join_fills_absent_counterpart_columns() -> anyhow::Result<()> {
    let left = Graph::from_iter("a").sort(["k"]);
    let right = Graph::from_iter("b").sort(["k"]);
    let graph = left.join(Joiner::outer("", ""), right, ["k"]);

    let mut a1 = Row::new();
    a1.set("k", 1i64).set("a", "x");
    let mut a2 = Row::new();
    a2.set("k", 2i64).set("a", "y");
    let mut b1 = Row::new();
    b1.set("k", 2i64).set("b", "p");
    let mut b2 = Row::new();
    b2.set("k", 3i64).set("b", "q");

    let out = TestGraph::new(graph)
        .with_input("a", vec![a1, a2])
        .with_input("b", vec![b1, b2])
        .run()?;

    let expected = vec![
        RowBuilder::new().set("k", 1i64).set("a", "x").build(),
        RowBuilder::new().set("k", 2i64).set("a", "y").set("b", "p").build(),
        RowBuilder::new().set("k", 3i64).set("b", "q").build(),
    ];
    assert_rows_eq_multiset(&out, &expected);
    Ok(())
}

/// Deterministic pseudo-random i64 sequence (splitmix64), used so the large
/// external-sort test doesn't need a `rand` dependency.
fn splitmix64(n: usize, mut seed: u64) -> Vec<i64> {
    (0..n)
        .map(|_| {
            seed = seed.wrapping_add(0x9E3779B97F4A7C15);
            let mut z = seed;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
            ((z ^ (z >> 31)) as i64).rem_euclid(1_000_000)
        })
        .collect()
}

#[test]
fn external_sort_matches_reference_sort_across_chunk_sizes() -> anyhow::Result<()> {
    let values = splitmix64(10_000, 0xC0FFEE);
    let mut expected = values.clone();
    expected.sort();

    for chunk_rows in [1usize, 7, 1000, 10_000] {
        let rows: Vec<Row> = values.iter().map(|v| Row::from_pairs([("v", *v)])).collect();
        let config = SortConfig { chunk_rows, spill_dir: None };
        let sorted: Vec<Row> = external_sort(rows_from_vec(rows), vec!["v".to_string()], config)?.collect::<anyhow::Result<_>>()?;
        let actual: Vec<i64> = sorted.iter().map(|r| r.get("v").unwrap().as_i64().unwrap()).collect();
        assert_eq!(actual, expected, "mismatch at chunk_rows={chunk_rows}");
    }
    Ok(())
}
