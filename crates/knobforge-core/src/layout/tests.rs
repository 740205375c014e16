//! Tests for field layouts.

use super::*;
use crate::spec::Spec;
use crate::test_utils::LabelTree;

fn bits_and_quad() -> FieldLayout {
    FieldLayout::from_specs(vec![Spec::bit(), Spec::disc(4), Spec::bit(), Spec::bit()]).unwrap()
}

fn term_disc_bits() -> FieldLayout {
    FieldLayout::from_specs(vec![
        Spec::bit(),
        Spec::disc(3),
        LabelTree::sample().spec(),
        Spec::bit(),
    ])
    .unwrap()
}

mod construction {
    use super::*;

    #[test]
    fn test_empty_layout() {
        let layout = FieldLayout::new();
        assert!(layout.is_empty());
        assert_eq!(layout.packed_width(), 0);
        assert_eq!(layout.raw_size(), 0);
        assert_eq!(layout.dim_size(), 0);
        assert_eq!(layout.term_to_raw_idx(0), 0);
    }

    #[test]
    fn test_booleans_trail_discs() {
        let layout = bits_and_quad();
        assert_eq!(layout.raw_size(), 4);
        assert_eq!(layout.packed_width(), 1);
        assert_eq!(layout.n_bits(), 3);
        assert_eq!(layout.n_disc_fields(), 1);
        assert_eq!(layout.begin_disc_raw_idx(), 0);
        assert_eq!(layout.end_disc_raw_idx(), 1);
        assert_eq!(layout.begin_bit_raw_idx(), 1);
        assert_eq!(layout.end_bit_raw_idx(), 4);
        assert_eq!(layout.fields()[0], Field::new(2, 0, 0));
        assert_eq!(layout.fields()[1], Field::new(1, 0, 2));
        assert_eq!(layout.fields()[3], Field::new(1, 0, 4));
        assert_eq!(layout.disc_and_bit()[0].multiplicity, 4);
    }

    #[test]
    fn test_term_zone_is_word_aligned() {
        let layout = term_disc_bits();
        assert_eq!(layout.n_term_fields(), 3);
        assert_eq!(layout.end_term_raw_idx(), 3);
        assert_eq!(layout.begin_disc_raw_idx(), 3);
        assert_eq!(layout.end_disc_raw_idx(), 4);
        assert_eq!(layout.begin_bit_raw_idx(), 4);
        assert_eq!(layout.end_bit_raw_idx(), 6);

        assert_eq!(layout.term_fields()[2], Field::new(2, 0, 4));
        assert_eq!(layout.disc_fields()[0], Field::new(2, 1, 0));
        assert_eq!(layout.bit_fields()[0], Field::new(1, 1, 2));
        assert_eq!(layout.packed_width(), 2);
    }

    #[test]
    fn test_repeated_terms_start_on_fresh_words() {
        let layout = FieldLayout::repeated(LabelTree::sample().spec(), 2).unwrap();
        assert_eq!(layout.term().len(), 2);
        assert_eq!(layout.term_to_raw_idx(1), 3);
        assert_eq!(layout.fields()[3], Field::new(2, 1, 0));
        assert_eq!(layout.packed_width(), 2);
    }

    #[test]
    fn test_fields_never_straddle_words() {
        let layout = FieldLayout::repeated(Spec::disc(8), 22).unwrap();
        assert_eq!(layout.fields()[20], Field::new(3, 0, 60));
        assert_eq!(layout.fields()[21], Field::new(3, 1, 0));
        assert_eq!(layout.packed_width(), 2);
    }

    #[test]
    fn test_zero_width_field_on_word_boundary_takes_no_word() {
        let mut specs = vec![Spec::disc(4); 32];
        specs.push(Spec::disc(1));
        let layout = FieldLayout::from_specs(specs).unwrap();
        assert_eq!(layout.fields()[31], Field::new(2, 0, 62));
        assert_eq!(layout.fields()[32], Field::new(0, 0, 64));
        assert_eq!(layout.packed_width(), 1);

        let mut inst = layout.new_instance();
        inst.packed_mut()[0] = u64::MAX;
        layout.set_raw(inst.packed_mut(), 32, 1);
        assert_eq!(layout.get_raw(inst.packed(), 32), 0);
        assert_eq!(inst.packed(), &[u64::MAX]);
    }

    #[test]
    fn test_identical_specs_are_counted() {
        let layout =
            FieldLayout::from_specs(vec![Spec::disc(3), Spec::bit(), Spec::disc(3)]).unwrap();
        assert_eq!(layout.disc_and_bit().len(), 3);
        assert_eq!(layout.to_string(), "{disc(3) disc(3) bit}");
    }

    #[test]
    fn test_contin_has_no_raw_fields() {
        let layout =
            FieldLayout::from_specs(vec![Spec::contin(1.0, 3), Spec::bit(), Spec::contin(1.0, 3)])
                .unwrap();
        assert_eq!(layout.raw_size(), 1);
        assert_eq!(layout.n_contin_fields(), 2);
        assert_eq!(layout.new_instance().contin_len(), 2);
    }

    #[test]
    fn test_dim_size_counts_knobs() {
        let layout = FieldLayout::from_specs(vec![
            LabelTree::sample().spec(),
            Spec::contin(0.5, 2),
            Spec::disc(5),
            Spec::disc(3),
            Spec::bit(),
            Spec::bit(),
        ])
        .unwrap();
        assert_eq!(layout.dim_size(), 2 + 2 + 1 + 1);
        assert_eq!(layout.raw_size(), 3 + 2 + 2);
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let err = FieldLayout::from_specs(vec![Spec::bit(), Spec::disc(0)]).unwrap_err();
        assert_eq!(err, KnobError::ZeroMultiplicity);
    }

    #[test]
    fn test_clone_is_equal() {
        let layout = term_disc_bits();
        let copy = layout.clone();
        assert_eq!(copy, layout);
        assert_eq!(copy.end_term_raw_idx(), layout.end_term_raw_idx());
    }

    #[test]
    fn test_byte_size_grows_with_fields() {
        let small = FieldLayout::repeated(Spec::bit(), 1).unwrap();
        let large = FieldLayout::repeated(Spec::bit(), 100).unwrap();
        assert!(large.byte_size() > small.byte_size());
    }
}

mod raw_access {
    use super::*;

    #[test]
    fn test_set_then_get_round_trip() {
        let layout = term_disc_bits();
        let mut inst = layout.new_instance();
        for idx in 0..layout.raw_size() {
            let max = (1u32 << layout.fields()[idx].width) - 1;
            layout.set_raw(inst.packed_mut(), idx, max);
            assert_eq!(layout.get_raw(inst.packed(), idx), max);
            layout.set_raw(inst.packed_mut(), idx, 1);
            assert_eq!(layout.get_raw(inst.packed(), idx), 1);
        }
        for idx in 0..layout.raw_size() {
            assert_eq!(layout.get_disc_raw(&inst, idx), 1);
        }
    }

    #[test]
    fn test_set_raw_leaves_neighbours_alone() {
        let layout = FieldLayout::repeated(Spec::disc(4), 3).unwrap();
        let mut inst = layout.new_instance();
        layout.set_raw(inst.packed_mut(), 0, 3);
        layout.set_raw(inst.packed_mut(), 2, 3);
        layout.set_raw(inst.packed_mut(), 1, 2);
        layout.set_raw(inst.packed_mut(), 1, 0);
        assert_eq!(inst.packed()[0], 0b11_00_11);
    }

    #[test]
    fn test_pack_honours_widths() {
        let layout = bits_and_quad();
        let mut out = vec![0; 1];
        let end = layout.pack([3, 1, 0, 1], &mut out);
        assert_eq!(end, 1);
        assert_eq!(out[0], 3 | 1 << 2 | 1 << 4);
    }

    #[test]
    fn test_pack_pads_terms() {
        let layout = term_disc_bits();
        let mut out = vec![0; 2];
        let end = layout.pack([1, 2, 0, 2, 1, 1], &mut out);
        assert_eq!(end, 2);
        assert_eq!(out, vec![1 | 2 << 2, 2 | 1 << 2 | 1 << 3]);
    }

    #[test]
    #[should_panic(expected = "pack expected")]
    fn test_pack_short_input_panics() {
        let layout = bits_and_quad();
        let mut out = vec![0; 1];
        layout.pack([1, 1], &mut out);
    }

    #[test]
    fn test_term_decoding() {
        let layout = term_disc_bits();
        let mut inst = layout.new_instance();
        assert_eq!(layout.get_term(inst.packed(), 0), Some("and"));

        layout.set_term_path(inst.packed_mut(), 0, &[1]);
        assert_eq!(layout.get_term(inst.packed(), 0), Some("x"));

        layout.set_term_path(inst.packed_mut(), 0, &[2, 2]);
        assert_eq!(layout.get_term(inst.packed(), 0), Some("z"));
        assert_eq!(layout.term_path(inst.packed(), 0).as_slice(), &[2, 2, 0]);

        layout.set_term_path(inst.packed_mut(), 0, &[2, 3]);
        assert_eq!(layout.get_term(inst.packed(), 0), None);
    }

    #[test]
    fn test_multiplicity_lookup() {
        let layout = term_disc_bits();
        assert_eq!(layout.multiplicity(3), 3);
        assert_eq!(layout.multiplicity(5), 2);
        assert_eq!(layout.raw_to_disc_idx(4), 1);
    }

    #[test]
    #[should_panic(expected = "not a discrete field")]
    fn test_term_field_has_no_multiplicity() {
        let layout = term_disc_bits();
        layout.multiplicity(0);
    }

    #[test]
    fn test_contin_access() {
        let layout = FieldLayout::repeated(Spec::contin(1.0, 2), 2).unwrap();
        let mut inst = layout.new_instance();
        layout.set_contin(&mut inst, 1, -0.75);
        assert_eq!(layout.get_contin(&inst, 1), -0.75);
        assert_eq!(layout.get_contin(&inst, 0), 0.0);
    }

    #[test]
    fn test_check_instance() {
        let layout = term_disc_bits();
        assert!(layout.check_instance(&layout.new_instance()).is_ok());
        assert_eq!(
            layout.check_instance(&Instance::new(5, 0)),
            Err(KnobError::ShapeMismatch {
                expected_words: 2,
                expected_contin: 0,
                actual_words: 5,
                actual_contin: 0,
            })
        );
    }
}

mod comparison {
    use super::*;

    #[test]
    fn test_hamming_distance_to_self_is_zero() {
        let layout = term_disc_bits();
        let mut inst = layout.new_instance();
        layout.pack([1, 2, 0, 2, 1, 0], inst.packed_mut());
        assert_eq!(layout.hamming_distance(&inst, &inst), 0);
    }

    #[test]
    fn test_hamming_distance_counts_changed_fields() {
        let layout = bits_and_quad();
        let a = layout.new_instance();
        let mut b = a.clone();
        layout.set_raw(b.packed_mut(), 2, 1);
        assert_eq!(layout.hamming_distance(&a, &b), 1);
        layout.set_raw(b.packed_mut(), 0, 3);
        assert_eq!(layout.hamming_distance(&a, &b), 2);
        assert_eq!(layout.hamming_distance(&b, &a), 2);
    }

    #[test]
    #[should_panic(expected = "differently sized")]
    fn test_hamming_distance_size_mismatch_panics() {
        let layout = bits_and_quad();
        layout.hamming_distance(&Instance::new(1, 0), &Instance::new(2, 0));
    }

    #[test]
    fn test_merge_instance() {
        let layout = FieldLayout::from_specs(vec![
            Spec::disc(4),
            Spec::bit(),
            Spec::bit(),
            Spec::bit(),
            Spec::contin(1.0, 2),
        ])
        .unwrap();
        let base = layout.new_instance();
        let mut reference = layout.new_instance();
        layout.pack([3, 1, 0, 0], reference.packed_mut());
        reference.contin_mut()[0] = 2.5;
        let mut target = layout.new_instance();
        layout.pack([1, 0, 1, 1], target.packed_mut());
        target.contin_mut()[0] = 5.0;

        layout.merge_instance(&mut target, &base, &reference);

        let raw: Vec<_> = layout.begin_raw(&target).collect();
        assert_eq!(raw, vec![3, 1, 1, 1]);
        assert_eq!(target.contin(), reference.contin());
    }

    #[test]
    #[should_panic(expected = "merge of differently sized")]
    fn test_merge_size_mismatch_panics() {
        let layout = bits_and_quad();
        let mut target = Instance::new(2, 0);
        layout.merge_instance(&mut target, &Instance::new(1, 0), &Instance::new(1, 0));
    }

    #[test]
    fn test_count_nonzero_fields() {
        let layout = bits_and_quad();
        let mut inst = layout.new_instance();
        assert_eq!(layout.count(&inst), 0);
        layout.pack([2, 0, 1, 1], inst.packed_mut());
        assert_eq!(layout.count(&inst), 3);
    }
}

mod rendering {
    use super::*;

    #[test]
    fn test_display_lists_specs() {
        assert_eq!(
            term_disc_bits().to_string(),
            "{term(depth=3, branching=4) disc(3) bit bit}"
        );
    }

    #[test]
    fn test_instance_to_string() {
        let layout = term_disc_bits();
        let mut inst = layout.new_instance();
        layout.pack([2, 2, 0, 2, 0, 1], inst.packed_mut());
        assert_eq!(layout.instance_to_string(&inst), "[z 2 01]");
        assert_eq!(layout.instance_to_string_raw(&inst), "[2 2 0 2 0 1]");
    }
}
