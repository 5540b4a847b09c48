//! Fixture graph builders for the scenarios in `SPEC_FULL.md` §8, ported
//! from `examples/original_source/graphs.py`'s `word_count_graph`,
//! `inverted_index_graph`, `pmi_graph` and `yandex_maps_graph`.

use crate::graph::Graph;
use crate::joiners::Joiner;
use crate::mappers::{
    CalculateDistance, Filter, FilterPunctuation, Hour, InverseFrequency, LowerCase, Product, Project, Speed, Split,
    TimeDelta, WeekDay,
};
use crate::reducers::{Count, Direction, FirstReducer, Mean, TermFrequency, TopN};
use crate::row::Row;
use crate::value::Value;

/// Count occurrences of each word in `text_column`, sorted by `(count, text)`.
pub fn word_count_graph(input: &str, text_column: &str, count_column: &str) -> Graph {
    Graph::from_iter(input)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column, None))
        .sort([text_column])
        .reduce(Count::new(count_column), [text_column])
        .sort([count_column, text_column])
}

/// Per-`(doc_id, word)` TF-IDF, top 3 words by score per word, projected to
/// `{doc_column, text_column, result_column}`.
pub fn inverted_index_graph(input: &str, doc_column: &str, text_column: &str, result_column: &str) -> Graph {
    let words = Graph::from_iter(input)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column, None));

    let docs_amount = "docs_amount";
    let total_docs = Graph::from_iter(input)
        .sort([doc_column])
        .reduce(Count::new(docs_amount), Vec::<String>::new());

    let idf_graph = words
        .sort([doc_column, text_column])
        .reduce(FirstReducer, [doc_column, text_column])
        .sort([text_column])
        .reduce(Count::new(docs_amount), [text_column])
        .join(Joiner::inner("", "_overall"), total_docs, Vec::<String>::new())
        .map(InverseFrequency::new(format!("{docs_amount}_overall"), docs_amount, "idf"));

    words
        .sort([doc_column])
        .reduce(TermFrequency::new(text_column, "tf"), [doc_column])
        .sort([text_column])
        .join(Joiner::inner("", ""), idf_graph, [text_column])
        .map(Product::new(["tf", "idf"], result_column))
        .reduce(TopN::new(result_column, 3, Direction::Largest), [text_column])
        .sort([doc_column])
        .map(Project::new([doc_column, text_column, result_column]))
}

/// Per-document top-10 words by pointwise mutual information, restricted to
/// words longer than 4 characters that occur more than once in the document.
pub fn pmi_graph(input: &str, doc_column: &str, text_column: &str, result_column: &str) -> Graph {
    let words_amount = "words_amount";
    let text_column_owned = text_column.to_string();

    let split_sorted = Graph::from_iter(input)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column, None))
        .sort([doc_column, text_column]);

    let repeated_long_words = split_sorted
        .reduce(Count::new(words_amount), [doc_column, text_column])
        .map(Filter::new(move |row: &Row| {
            let word_len = row
                .get(&text_column_owned)
                .and_then(|v| v.as_str().ok())
                .map(str::len)
                .unwrap_or(0);
            let count = row.get(words_amount).and_then(|v| v.as_i64().ok()).unwrap_or(0);
            word_len > 4 && count > 1
        }));

    let filtered = split_sorted.join(Joiner::inner("", ""), repeated_long_words, [doc_column, text_column]);

    let frequency_column = "words_frequency";
    let corpus_frequency = filtered
        .reduce(TermFrequency::new(text_column, frequency_column), Vec::<String>::new())
        .sort([text_column]);

    filtered
        .sort([doc_column])
        .reduce(TermFrequency::new(text_column, frequency_column), [doc_column])
        .sort([text_column])
        .join(Joiner::inner("", "_overall"), corpus_frequency, [text_column])
        .map(InverseFrequency::new(frequency_column, format!("{frequency_column}_overall"), result_column))
        .sort([doc_column, result_column])
        .reduce(TopN::new(result_column, 10, Direction::Largest), [doc_column])
        .map(Project::new([doc_column, text_column, result_column]))
}

/// Mean travel speed (km/h) grouped by `(weekday, hour)`, from an edges
/// source (`edge_id`, `start`, `end` geo columns) and a traversals source
/// (`edge_id`, `enter_time`, `leave_time`).
pub fn yandex_maps_graph(
    time_input: &str,
    length_input: &str,
    enter_time_column: &str,
    leave_time_column: &str,
    edge_id_column: &str,
    start_column: &str,
    end_column: &str,
) -> Graph {
    let distance_column = "length";
    let coord_graph = Graph::from_iter(length_input)
        .map(CalculateDistance::new(start_column, end_column, distance_column))
        .sort([edge_id_column]);

    let time_delta_column = "time_delta";
    Graph::from_iter(time_input)
        .map(WeekDay::new(enter_time_column, "weekday"))
        .map(Hour::new(enter_time_column, "hour"))
        .map(TimeDelta::new(enter_time_column, leave_time_column, time_delta_column))
        .sort([edge_id_column])
        .join(Joiner::inner("", ""), coord_graph, [edge_id_column])
        .map(Speed::new(distance_column, time_delta_column, "speed"))
        .sort(["weekday", "hour"])
        .reduce(Mean::new("speed"), ["weekday", "hour"])
        .map(Project::new(["weekday", "hour", "speed"]))
}

/// A geo value as `(longitude, latitude)`, for building fixture input rows.
pub fn geo(lon: f64, lat: f64) -> Value {
    Value::Geo(lon, lat)
}
