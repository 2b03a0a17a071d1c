mod helpers;

use std::collections::VecDeque;

use helpers::{letters, unsorted_numbers, word_lists};
use sluice_core::{Pipeline, PipelineError};

mod evaluation_tests {
    use super::*;

    #[test]
    fn it_should_count_surviving_elements() {
        helpers::init_tracing();

        // Given
        let mut pipeline =
            Pipeline::from_collection(letters()).filter(|element| element.contains('B'));

        // When / Then
        assert_eq!(pipeline.count().unwrap(), 2);
    }

    #[test]
    fn it_should_consume_in_encounter_order() {
        // Given
        let mut seen = Vec::new();
        let mut pipeline = Pipeline::from_collection(letters());

        // When
        pipeline.for_each(|element| seen.push(element)).unwrap();

        // Then
        assert_eq!(seen, letters());
    }

    #[test]
    fn it_should_answer_match_queries() {
        let mut any = Pipeline::from_collection(letters()).map(|element| element + "1");
        assert!(any.any_match(|element| element.contains('C')).unwrap());

        let mut all = Pipeline::from_collection(letters()).map(|element| element + "1");
        assert!(all.all_match(|element| element.contains('1')).unwrap());

        let mut none = Pipeline::from_collection(letters()).map(|element| element + "1");
        assert!(none.none_match(|element| element.contains('2')).unwrap());
    }

    #[test]
    fn it_should_short_circuit_on_an_unbounded_source() {
        // Given an endless source, a decisive element must stop the pull
        let mut any = Pipeline::from_iterator(1i64..);
        assert!(any.any_match(|n| *n > 10).unwrap());

        let mut all = Pipeline::from_iterator(1i64..);
        assert!(!all.all_match(|n| *n < 5).unwrap());
    }

    #[test]
    fn it_should_find_the_first_match() {
        // Given
        let mut pipeline =
            Pipeline::from_collection(letters()).filter(|element| element.contains('B'));

        // Then
        assert_eq!(pipeline.find_first().unwrap(), Some("B".to_string()));
    }

    #[test]
    fn it_should_find_any_like_find_first_when_sequential() {
        let mut pipeline =
            Pipeline::from_collection(letters()).filter(|element| element.contains('B'));
        assert_eq!(pipeline.find_any().unwrap(), Some("B".to_string()));
    }

    #[test]
    fn it_should_find_nothing_in_an_empty_pipeline() {
        let mut pipeline = Pipeline::from_collection(Vec::<i64>::new());
        assert_eq!(pipeline.find_first().unwrap(), None);
    }

    #[test]
    fn it_should_reduce_from_an_identity_value() {
        // Given
        let mut pipeline = Pipeline::from_collection(vec![1, 1, 1]);

        // When
        let total = pipeline.reduce(23, |acc, n| acc + n).unwrap();

        // Then
        assert_eq!(total, 26);
    }

    #[test]
    fn it_should_sum_a_numeric_pipeline() {
        let mut pipeline = Pipeline::from_range(1, 4);
        assert_eq!(pipeline.sum().unwrap(), 6);
    }
}

mod container_tests {
    use super::*;

    #[test]
    fn it_should_collect_in_encounter_order_through_any_chain() {
        // Given a chain mixing every element-local stage
        let mut pipeline = Pipeline::from_collection(word_lists())
            .flat_map(|words| words)
            .filter(|word| word.len() > 1)
            .map(|word| word.to_lowercase());

        // Then the output order is the encounter order of the source
        assert_eq!(
            pipeline.to_vec().unwrap(),
            vec!["hi", "i'm", "carlos", "like", "soda", "and", "pizza", "goodbye"]
        );
    }

    #[test]
    fn it_should_collect_into_a_caller_supplied_container() {
        // Given
        let mut pipeline = Pipeline::from_range(0, 4);

        // When
        let collected = pipeline.collect_into(VecDeque::new()).unwrap();

        // Then
        assert_eq!(collected, VecDeque::from(vec![0, 1, 2, 3]));
    }

    #[test]
    fn it_should_collect_into_a_boxed_slice() {
        let mut pipeline = Pipeline::from_collection(letters());
        let array = pipeline.to_array().unwrap();
        assert_eq!(array.len(), 4);
        assert_eq!(array.first().map(String::as_str), Some("A"));
    }
}

mod extremal_tests {
    use super::*;

    #[test]
    fn it_should_find_natural_extremes() {
        let mut min = Pipeline::from_slice(&[2, 5, 4, 1]);
        assert_eq!(min.min().unwrap(), Some(1));

        let mut max = Pipeline::from_slice(&[2, 5, 4, 1]);
        assert_eq!(max.max().unwrap(), Some(5));
    }

    #[test]
    fn it_should_find_extremes_under_a_comparator() {
        // Given a reversed comparator, min and max swap
        let mut pipeline = Pipeline::from_collection(unsorted_numbers());
        assert_eq!(pipeline.min_by(|a, b| b.cmp(a)).unwrap(), Some(156));

        let mut pipeline = Pipeline::from_collection(unsorted_numbers());
        assert_eq!(pipeline.max_by(|a, b| b.cmp(a)).unwrap(), Some(2));
    }

    #[test]
    fn it_should_yield_no_extremes_when_empty() {
        let mut pipeline = Pipeline::from_collection(Vec::<i64>::new());
        assert_eq!(pipeline.min().unwrap(), None);
    }
}

mod reuse_tests {
    use super::*;

    #[test]
    fn it_should_fail_when_driven_twice() {
        // Given
        let mut pipeline = Pipeline::from_collection(letters());
        let _ = pipeline.count().unwrap();

        // When
        let error = pipeline.count().unwrap_err();

        // Then
        assert!(matches!(error, PipelineError::AlreadyConsumed));
        assert_eq!(
            error.to_string(),
            "pipeline has already been consumed by a terminal operation"
        );
    }

    #[test]
    fn it_should_fail_across_different_terminal_operations() {
        let mut pipeline = Pipeline::from_collection(letters());
        let _ = pipeline.to_vec().unwrap();
        assert!(pipeline.find_first().is_err());
    }
}
