use assert2::check;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rstest::rstest;
use statwise_aggregation::{
    Aggregation, AggregationData, AggregationKind, AggregationSnapshot, AggregationValue,
    BucketRange, CloseValue, CountAggregation, DistributionAggregation,
};

#[test]
fn bounds_are_copied_on_construction() {
    let mut bounds = vec![1.0, 2.0, 3.0];
    let aggregation = DistributionAggregation::new(&bounds);
    check!(aggregation.bounds() == bounds.as_slice());

    bounds[1] = 42.0;
    bounds.push(4.0);
    check!(aggregation.bounds() == &[1.0, 2.0, 3.0]);

    let mut value = aggregation.new_value();
    value.add_sample(2.5);
    check!(value.counts_per_bucket() == &[0, 0, 1, 0]);
}

#[test]
fn bounds_are_copied_through_the_enum() {
    let mut bounds = vec![0.5, 1.5];
    let aggregation = Aggregation::distribution(&bounds);
    bounds[0] = -100.0;
    let Aggregation::Distribution(distribution) = &aggregation else {
        panic!("expected a distribution, got {aggregation}");
    };
    check!(distribution.bounds() == &[0.5, 1.5]);
}

#[rstest]
#[case(&[])]
#[case(&[0.0])]
#[case(&[1.0, 2.0])]
#[case(&[1.0, 2.0, 4.0, 8.0, 16.0])]
fn bucket_count_matches_partition(#[case] bounds: &[f64]) {
    let aggregation = DistributionAggregation::new(bounds);
    check!(aggregation.num_buckets() == bounds.len() + 1);
    check!(aggregation.bucket_ranges().len() == bounds.len() + 1);
    check!(aggregation.new_value().counts_per_bucket().len() == bounds.len() + 1);

    let ranges: Vec<_> = aggregation.bucket_ranges().collect();
    check!(ranges.first().unwrap().start == f64::NEG_INFINITY);
    check!(ranges.last().unwrap().end == f64::INFINITY);
    for pair in ranges.windows(2) {
        check!(pair[0].end == pair[1].start);
    }
}

#[test]
fn no_bounds_is_a_single_bucket() {
    let aggregation = DistributionAggregation::new(Vec::<f64>::new());
    let ranges: Vec<_> = aggregation.bucket_ranges().collect();
    check!(
        ranges
            == vec![BucketRange {
                start: f64::NEG_INFINITY,
                end: f64::INFINITY
            }]
    );

    let mut value = aggregation.new_value();
    value.add_samples([-1e12, 0.0, 1e12]);
    check!(value.counts_per_bucket() == &[3]);
}

#[test]
fn single_bound_splits_underflow_and_overflow() {
    let aggregation = DistributionAggregation::new([0.0]);
    let ranges: Vec<_> = aggregation.bucket_ranges().collect();
    check!(
        ranges
            == vec![
                BucketRange {
                    start: f64::NEG_INFINITY,
                    end: 0.0
                },
                BucketRange {
                    start: 0.0,
                    end: f64::INFINITY
                },
            ]
    );

    let mut value = aggregation.new_value();
    value.add_samples([-0.5, 0.0, 0.5]);
    check!(value.counts_per_bucket() == &[1, 2]);
}

#[test]
fn three_bounds_make_four_buckets() {
    let aggregation = DistributionAggregation::new([1.0, 2.0, 3.0]);
    let ranges: Vec<_> = aggregation
        .bucket_ranges()
        .map(|r| (r.start, r.end))
        .collect();
    check!(
        ranges
            == vec![
                (f64::NEG_INFINITY, 1.0),
                (1.0, 2.0),
                (2.0, 3.0),
                (3.0, f64::INFINITY),
            ]
    );
}

#[test]
fn count_starts_at_zero() {
    let value = CountAggregation::new().new_value();
    check!(value.count() == 0);
    check!(value.is_empty());

    let value = Aggregation::count().new_value();
    check!(value.close() == AggregationSnapshot::Count(0));
}

#[test]
fn distribution_starts_empty() {
    let value = DistributionAggregation::new([1.0, 2.0]).new_value();
    check!(value.count() == 0);
    check!(value.sum() == 0.0);
    check!(value.min() == f64::INFINITY);
    check!(value.max() == f64::NEG_INFINITY);
    check!(value.counts_per_bucket() == &[0, 0, 0]);
    check!(value.bounds() == &[1.0, 2.0]);
}

#[rstest]
#[case(Aggregation::count())]
#[case(Aggregation::distribution([10.0, 20.0]))]
fn accumulators_are_independent(#[case] aggregation: Aggregation) {
    let mut first = aggregation.new_value();
    let second = aggregation.new_value();

    first.add_samples([5.0, 15.0, 25.0]);

    check!(!first.is_empty());
    check!(second.is_empty());
    check!(second == aggregation.new_value());
    check!(first.kind() == aggregation.kind());
}

#[test]
fn every_variant_is_an_aggregation() {
    let all: Vec<Aggregation> = vec![
        CountAggregation::new().into(),
        DistributionAggregation::new([1.0]).into(),
    ];
    let kinds: Vec<_> = all.iter().map(Aggregation::kind).collect();
    check!(kinds == vec![AggregationKind::Count, AggregationKind::Distribution]);
}

#[test]
fn unsorted_bounds_are_accepted() {
    let aggregation = DistributionAggregation::new([3.0, 1.0, 2.0, 2.0]);
    check!(aggregation.bounds() == &[3.0, 1.0, 2.0, 2.0]);

    let mut value = aggregation.new_value();
    // 0.5 < 3.0, 2.5 < 3.0, 3.5 overflows
    value.add_samples([0.5, 2.5, 3.5]);
    check!(value.counts_per_bucket() == &[2, 0, 0, 0, 1]);
}

#[test]
fn random_samples_land_in_their_range() {
    let aggregation = DistributionAggregation::new([-10.0, 0.0, 10.0, 100.0]);
    let ranges: Vec<_> = aggregation.bucket_ranges().collect();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let samples: Vec<f64> = (0..1000).map(|_| rng.random_range(-50.0..150.0)).collect();

    let mut expected = vec![0u64; ranges.len()];
    for sample in &samples {
        let matching: Vec<_> = ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.contains(*sample))
            .collect();
        check!(matching.len() == 1);
        expected[matching[0].0] += 1;
    }

    let mut value = aggregation.new_value();
    value.add_samples(samples.iter().copied());
    check!(value.counts_per_bucket() == expected.as_slice());
    check!(value.count() == 1000);
}

#[test]
fn merge_of_split_stream_matches_whole_stream() {
    let aggregation = Aggregation::distribution([0.25, 0.5, 0.75]);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let samples: Vec<f64> = (0..500).map(|_| rng.random_range(0.0..1.0)).collect();

    let mut whole = aggregation.new_value();
    whole.add_samples(samples.iter().copied());

    let (left, right) = samples.split_at(200);
    let mut merged = aggregation.new_value();
    merged.add_samples(left.iter().copied());
    let mut other = aggregation.new_value();
    other.add_samples(right.iter().copied());
    merged.merge(&other).unwrap();

    let (AggregationData::Distribution(whole), AggregationData::Distribution(merged)) =
        (whole, merged)
    else {
        panic!("expected distributions");
    };
    check!(merged.count() == whole.count());
    check!(merged.counts_per_bucket() == whole.counts_per_bucket());
    check!(merged.min() == whole.min());
    check!(merged.max() == whole.max());
    check!((merged.sum() - whole.sum()).abs() < 1e-9);
    check!((merged.mean() - whole.mean()).abs() < 1e-12);
    check!((merged.variance() - whole.variance()).abs() < 1e-12);
}
