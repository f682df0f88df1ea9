//! Variant scoring and nearest-match selection tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tagport_core::shader::{
    encode, select_nearest, shader_table, FallbackPolicy, OptionVector, PriorityTable,
    VariantMatcher, VariantOrdering, VariantScore, SCORE_BASE,
};
use tagport_core::{PortConfig, PortError};

/// Options of each dimension indexed by rank.
fn options_by_rank(table: &PriorityTable) -> Vec<Vec<u16>> {
    (0..table.dimension_count())
        .map(|dimension| {
            let mut ranked: Vec<(usize, u16)> = (0..table.option_count(dimension) as u16)
                .filter_map(|option| table.option_rank(dimension, option).map(|rank| (rank, option)))
                .collect();
            ranked.sort();
            ranked.into_iter().map(|(_, option)| option).collect()
        })
        .collect()
}

#[test]
fn test_raising_one_rank_adds_exactly_one_digit() {
    let table = shader_table().unwrap();
    let by_rank = options_by_rank(&table);
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for _ in 0..500 {
        let ranks: Vec<usize> = by_rank.iter().map(|options| rng.gen_range(0..options.len())).collect();
        let dimension = rng.gen_range(0..by_rank.len());
        if ranks[dimension] + 1 >= by_rank[dimension].len() {
            continue;
        }

        let lower: Vec<u16> = ranks.iter().enumerate().map(|(d, r)| by_rank[d][*r]).collect();
        let mut higher = lower.clone();
        higher[dimension] = by_rank[dimension][ranks[dimension] + 1];

        let lower_score = encode(&OptionVector::new(lower), &table).unwrap();
        let higher_score = encode(&OptionVector::new(higher), &table).unwrap();
        assert!(higher_score > lower_score);
        assert_eq!(
            higher_score.0 - lower_score.0,
            SCORE_BASE.pow(table.dimension_rank(dimension) as u32)
        );
    }
}

#[test]
fn test_more_significant_dimension_outweighs_all_below() {
    let table = shader_table().unwrap();
    let by_rank = options_by_rank(&table);

    // Every dimension at its highest rank except the most significant one
    let most_significant = (0..table.dimension_count())
        .max_by_key(|d| table.dimension_rank(*d))
        .unwrap();
    let mut saturated: Vec<u16> = by_rank.iter().map(|options| *options.last().unwrap()).collect();
    saturated[most_significant] = by_rank[most_significant][0];

    let mut step: Vec<u16> = by_rank.iter().map(|options| options[0]).collect();
    step[most_significant] = by_rank[most_significant][1];

    assert!(
        encode(&OptionVector::new(step), &table).unwrap()
            > encode(&OptionVector::new(saturated), &table).unwrap()
    );
}

#[test]
fn test_select_nearest_known_scores() {
    let scores: Vec<VariantScore> = [10, 25, 40].into_iter().map(VariantScore).collect();
    let pick = |target| select_nearest(&scores, VariantScore(target), FallbackPolicy::NoMatch);

    assert_eq!(pick(26), Some(2));
    assert_eq!(pick(10), Some(0));
    assert_eq!(pick(41), None);
    assert_eq!(
        select_nearest(&scores, VariantScore(41), FallbackPolicy::NearestInferior),
        Some(2)
    );
}

#[test]
fn test_matcher_end_to_end() {
    let table = shader_table().unwrap();
    let policy = PortConfig::default().variant_fallback;
    let templates = [
        "shaders\\shader_templates\\_0_0_0_0_0_0_0_0_0_0",
        "shaders\\shader_templates\\_0_1_0_0_1_0_0_0_0_0",
        "shaders\\shader_templates\\_1_2_0_0_1_2_1_0_0_0",
        "shaders\\shader_templates\\_0_0_0_0_3_0_0_0_0_0",
    ];
    let matcher = VariantMatcher::from_template_names(&table, policy, templates);
    assert_eq!(matcher.len(), 4);

    let scores: Vec<VariantScore> = matcher.candidates().map(|(score, _, _)| score).collect();
    assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]));

    // Detail bump on a plain cook torrance variant rounds up to the richer one
    let target = OptionVector::from_template_name("_0_2_0_0_1_0_0_0_0_0").unwrap();
    let (_, _, name) = matcher.find(&target).unwrap().unwrap();
    assert_eq!(*name, templates[2]);
    assert_eq!(
        table.describe(&target).split(", ").nth(1),
        Some("bump_mapping: detail")
    );

    // Option vectors round-trip through template names
    let options = OptionVector::from_template_name(templates[3]).unwrap();
    assert_eq!(options.to_template_name(table.family()), templates[3]);

    // Unranked material model cannot be compared
    let car_paint = OptionVector::from_template_name("_0_0_0_0_8_0_0_0_0_0").unwrap();
    assert_eq!(
        matcher.find(&car_paint).unwrap_err(),
        PortError::UnrankedOption {
            dimension: 4,
            option: 8
        }
    );
}

#[test]
fn test_matcher_with_inferior_fallback() {
    let table = shader_table().unwrap();
    let mut matcher = VariantMatcher::new(&table, FallbackPolicy::NearestInferior);
    matcher.insert(OptionVector::new(vec![0; 10]), 1u32).unwrap();
    matcher
        .insert(OptionVector::new(vec![0, 0, 0, 0, 1, 0, 0, 0, 0, 0]), 2u32)
        .unwrap();

    // Glass outranks cook torrance, so nothing scores above it
    let glass = OptionVector::new(vec![0, 0, 0, 0, 5, 0, 0, 0, 0, 0]);
    let (_, _, value) = matcher.find(&glass).unwrap().unwrap();
    assert_eq!(*value, 2);
}
