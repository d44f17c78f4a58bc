//! Placement invariants over generated documents

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use storymap_layout::compose;
use storymap_schema::{Activity, Backbone, Document, Persona, Story};

const VERSIONS: [&str; 4] = ["MVP", "Release1", "Beta", "Future"];

fn arb_document() -> impl Strategy<Value = Document> {
    let backbones = 1usize..5;
    backbones.prop_flat_map(|count| {
        let story = (0..count + 1, 0usize..VERSIONS.len(), proptest::option::of(1i64..6));
        proptest::collection::vec(story, 0..24).prop_map(move |stories| {
            let mut doc = Document::default();
            doc.story_map_structure.activities.push(Activity::new("ACT", "Activity"));
            for i in 0..count {
                doc.story_map_structure
                    .backbones
                    .push(Backbone::new(format!("BB-{}", i), "ACT", "Column", (count - i) as i64));
            }

            let mut persona = Persona::new("Generated");
            for (index, (column, version, sort)) in stories.into_iter().enumerate() {
                // column == count points at a backbone that does not exist
                let id = format!("ST-{:03}", index);
                let mut story = Story::new(id, "generated", format!("BB-{}", column))
                    .with_version(VERSIONS[version]);
                story.backbone_x_version_sort = sort;
                persona.stories.push(story);
            }
            doc.personas.insert("P".to_string(), persona);
            doc
        })
    })
}

proptest! {
    #[test]
    fn no_cell_holds_two_stories(doc in arb_document()) {
        let grid = compose(&doc);
        let placed: Vec<&str> = grid.placed().map(|(_, _, p)| p.story.id.as_str()).collect();
        let unique: HashSet<&str> = placed.iter().copied().collect();

        // Every placeable story appears exactly once
        let placeable = doc
            .stories()
            .filter(|(_, s)| doc.backbone(&s.backbone_id).is_some())
            .count();
        prop_assert_eq!(placed.len(), placeable);
        prop_assert_eq!(unique.len(), placed.len());
        for row in &grid.rows {
            prop_assert_eq!(row.len(), grid.column_count());
        }
    }

    #[test]
    fn later_bands_never_rise_above_earlier_ones(doc in arb_document()) {
        let grid = compose(&doc);
        let band_index: HashMap<&str, usize> = grid
            .bands
            .iter()
            .enumerate()
            .map(|(i, band)| (band.version.as_str(), i))
            .collect();

        let mut max_row_per_band = vec![0usize; grid.bands.len()];
        let mut min_row_per_band = vec![usize::MAX; grid.bands.len()];
        for (row, _, placed) in grid.placed() {
            let band = band_index[placed.version.as_str()];
            max_row_per_band[band] = max_row_per_band[band].max(row);
            min_row_per_band[band] = min_row_per_band[band].min(row);
        }

        for later in 1..grid.bands.len() {
            for earlier in 0..later {
                prop_assert!(min_row_per_band[later] > max_row_per_band[earlier]);
            }
            prop_assert_eq!(grid.slice_boundaries[later - 1], grid.bands[later].start_row);
        }
    }

    #[test]
    fn input_order_does_not_matter(doc in arb_document()) {
        let mut reversed = doc.clone();
        reversed.story_map_structure.backbones.reverse();
        for persona in reversed.personas.values_mut() {
            persona.stories.reverse();
        }

        prop_assert_eq!(compose(&doc), compose(&reversed));
    }
}
