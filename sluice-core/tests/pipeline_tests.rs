mod helpers;

use helpers::{letters, unsorted_numbers, word_lists};
use sluice_core::Pipeline;

mod creation_tests {
    use super::*;

    #[test]
    fn it_should_stream_a_collection_in_encounter_order() {
        helpers::init_tracing();

        // Given
        let items = letters();

        // When
        let mut pipeline = Pipeline::from_collection(items.clone());

        // Then
        assert_eq!(pipeline.to_vec().unwrap(), items);
    }

    #[test]
    fn it_should_stream_a_slice() {
        // Given / When
        let mut pipeline = Pipeline::from_slice(&[1, 2, 3]);

        // Then
        assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn it_should_build_a_sequence_element_by_element() {
        // Given
        let mut pipeline = Pipeline::builder().add("D").add("E").add("F").build();

        // Then
        assert_eq!(pipeline.to_vec().unwrap(), vec!["D", "E", "F"]);
    }

    #[test]
    fn it_should_stream_a_half_open_range() {
        let mut pipeline = Pipeline::from_range(1, 4);
        assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn it_should_yield_nothing_for_an_inverted_range() {
        let mut pipeline = Pipeline::from_range(5, 1);
        assert_eq!(pipeline.count().unwrap(), 0);
    }

    #[test]
    fn it_should_limit_an_unbounded_source() {
        // Given an endless source
        let mut pipeline = Pipeline::from_iterator(1i64..).limit(5);

        // Then only the first five elements are ever pulled
        assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    }
}

mod stage_tests {
    use super::*;

    #[test]
    fn it_should_count_distinct_elements() {
        // Given
        let mut pipeline = Pipeline::from_collection(letters()).distinct();

        // When / Then
        assert_eq!(pipeline.count().unwrap(), 3);
    }

    #[test]
    fn it_should_keep_the_first_occurrence_only() {
        let mut pipeline = Pipeline::from_collection(letters()).distinct();
        assert_eq!(pipeline.to_vec().unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn it_should_filter_by_predicate() {
        let mut pipeline =
            Pipeline::from_collection(letters()).filter(|element| element.contains('B'));
        assert_eq!(pipeline.to_vec().unwrap(), vec!["B", "B"]);
    }

    #[test]
    fn it_should_map_every_element() {
        let mut pipeline = Pipeline::from_collection(letters()).map(|element| element + "Z");
        assert_eq!(pipeline.to_vec().unwrap(), vec!["AZ", "BZ", "BZ", "CZ"]);
    }

    #[test]
    fn it_should_paginate_with_skip_and_limit() {
        // Given
        let mut pipeline = Pipeline::from_collection((1..=10).collect::<Vec<i32>>())
            .skip(3)
            .limit(5);

        // Then
        assert_eq!(pipeline.to_vec().unwrap(), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn it_should_yield_nothing_when_skipping_past_the_end() {
        let mut pipeline = Pipeline::from_collection(vec![1, 2, 3]).skip(7);
        assert_eq!(pipeline.count().unwrap(), 0);
    }

    #[test]
    fn it_should_sort_by_natural_order() {
        let mut pipeline = Pipeline::from_collection(unsorted_numbers()).sorted();
        assert_eq!(
            pipeline.to_vec().unwrap(),
            vec![2, 5, 7, 12, 26, 34, 58, 62, 88, 156]
        );
    }

    #[test]
    fn it_should_sort_with_a_comparator() {
        // Given the natural order, reversed
        let mut ascending = Pipeline::from_collection(unsorted_numbers()).sorted();
        let mut expected = ascending.to_vec().unwrap();
        expected.reverse();

        // When
        let mut descending =
            Pipeline::from_collection(unsorted_numbers()).sorted_by(|a, b| b.cmp(a));

        // Then
        assert_eq!(descending.to_vec().unwrap(), expected);
    }

    #[test]
    fn it_should_flatten_sub_sequences_in_encounter_order() {
        // Given
        let mut pipeline = Pipeline::from_collection(word_lists()).flat_map(|words| words);

        // Then
        assert_eq!(
            pipeline.to_vec().unwrap(),
            vec!["Hi", "i'm", "Carlos", "I", "like", "soda", "and", "pizza", "Goodbye"]
        );
    }

    #[test]
    fn it_should_chain_stages_after_a_flatten() {
        let mut pipeline = Pipeline::from_collection(word_lists())
            .flat_map(|words| words)
            .filter(|word| word.len() > 4)
            .map(|word| word.to_uppercase());
        assert_eq!(pipeline.to_vec().unwrap(), vec!["CARLOS", "PIZZA", "GOODBYE"]);
    }

    #[test]
    fn it_should_preserve_stage_order() {
        // Given filter-then-map versus map-then-filter over the same input
        let mut filtered_first = Pipeline::from_range(0, 10).filter(|n| n % 2 == 0).map(|n| n + 1);
        let mut mapped_first = Pipeline::from_range(0, 10).map(|n| n + 1).filter(|n| n % 2 == 0);

        // Then the results differ exactly as the order dictates
        assert_eq!(filtered_first.to_vec().unwrap(), vec![1, 3, 5, 7, 9]);
        assert_eq!(mapped_first.to_vec().unwrap(), vec![2, 4, 6, 8, 10]);
    }

    #[test]
    #[should_panic(expected = "cannot append a stage")]
    fn it_should_panic_when_extending_a_consumed_pipeline() {
        let mut pipeline = Pipeline::from_collection(vec![1, 2, 3]);
        let _ = pipeline.count();
        let _ = pipeline.filter(|n| *n > 1);
    }
}
