//! Property-based tests for registry keys
//!
//! Uses proptest to verify the laws every table key relies on:
//! 1. Equality is component-wise
//! 2. Equal keys have equal hashes
//! 3. The hash is the exclusive-or of the component hashes
//! 4. An empty name and no name are the same key

use proptest::prelude::*;
use reinhardt_ioc::{KeyPart, KeyedPair, NamedKey, RelationKey, TypeKey};
use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};

struct Alpha;
struct Beta;
struct Gamma;

fn type_keys() -> [TypeKey; 3] {
	[TypeKey::of::<Alpha>(), TypeKey::of::<Beta>(), TypeKey::of::<Gamma>()]
}

fn type_key() -> impl Strategy<Value = TypeKey> {
	(0usize..3).prop_map(|index| type_keys()[index])
}

fn name() -> impl Strategy<Value = Option<String>> {
	prop::option::of("[a-c]{0,2}")
}

proptest! {
	// Property 1: component-wise equality
	#[test]
	fn prop_equality_is_componentwise(
		first in type_key(),
		second in type_key(),
		left in name(),
		right in name(),
	) {
		let a = NamedKey::named(first, left.as_deref());
		let b = NamedKey::named(second, right.as_deref());

		let left = left.filter(|n| !n.is_empty());
		let right = right.filter(|n| !n.is_empty());
		prop_assert_eq!(a == b, first == second && left == right);
	}

	// Property 2: equal keys hash equally, through any hasher
	#[test]
	fn prop_equal_keys_hash_equally(ty in type_key(), key_name in name()) {
		let a = NamedKey::named(ty, key_name.as_deref());
		let b = NamedKey::named(ty, key_name.as_deref());
		let state = RandomState::new();

		prop_assert_eq!(&a, &b);
		prop_assert_eq!(a.combined_hash(), b.combined_hash());
		prop_assert_eq!(state.hash_one(&a), state.hash_one(&b));
	}

	// Property 3: combined hash is the xor of the parts
	#[test]
	fn prop_hash_is_xor_of_parts(context in type_key(), base in type_key()) {
		let key = RelationKey::new(context, base);

		prop_assert_eq!(key.combined_hash(), context.part_hash() ^ base.part_hash());
		if context == base {
			prop_assert_eq!(key.combined_hash(), 0);
		}
	}

	// Property 4: absent and empty names collapse to one table slot
	#[test]
	fn prop_empty_name_is_default_slot(ty in type_key(), value in any::<u32>()) {
		let mut table = HashMap::new();
		table.insert(NamedKey::named(ty, None), value);
		table.insert(NamedKey::named(ty, Some("")), value.wrapping_add(1));

		prop_assert_eq!(table.len(), 1);
		prop_assert_eq!(table.get(&NamedKey::named(ty, None)), Some(&value.wrapping_add(1)));
	}

	// Absent components contribute nothing to the hash
	#[test]
	fn prop_absent_component_hashes_to_zero(ty in type_key()) {
		let key: KeyedPair<TypeKey, Option<String>> = KeyedPair::new(ty, None);

		prop_assert_eq!(key.combined_hash(), ty.part_hash());
	}
}
