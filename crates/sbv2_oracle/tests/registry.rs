use std::collections::HashSet;
use std::thread;

use sbv2_layout::Discriminator;
use sbv2_layout::LayoutError;
use sbv2_layout::Pubkey;
use sbv2_layout::SchemaKind;
use sbv2_oracle::prelude::*;
use sbv2_oracle::*;

fn task_spec() -> TaskSpecRecord {
	TaskSpecRecord {
		hash: Hash { data: [7; 32] },
	}
}

#[test]
fn registry_holds_every_record() {
	let registry = registry().unwrap();
	assert_eq!(registry.len(), 12);

	let names: Vec<&str> = registry.iter().map(|schema| schema.name()).collect();
	assert_eq!(
		names,
		[
			"SbState",
			"TaskSpecRecord",
			"OracleAccountData",
			"PermissionAccountData",
			"oracle_heartbeat",
			"lease_withdraw",
			"crank_push",
			"permission_set",
			"vault_transfer",
			"aggregator_open_round",
			"lease_set_authority",
			"aggregator_set_queue",
		]
	);

	let accounts = registry
		.iter()
		.filter(|schema| schema.kind() == SchemaKind::Account)
		.count();
	assert_eq!(accounts, 4);
}

#[test]
fn discriminators_are_unique() {
	let registry = registry().unwrap();
	let unique: HashSet<Discriminator> = registry.iter().map(|schema| schema.discriminator()).collect();
	assert_eq!(unique.len(), registry.len());
}

#[test]
fn lookups_by_name_and_discriminator_agree() {
	let registry = registry().unwrap();
	for schema in registry.iter() {
		assert_eq!(registry.get(schema.name()), Some(schema));
		assert_eq!(registry.by_discriminator(&schema.discriminator()), Some(schema));
	}
	assert_eq!(registry.get("AggregatorAccountData"), None);
}

#[test]
fn sniffing_identifies_account_bytes() {
	let wire = task_spec().to_wire().unwrap();
	let (schema, fields) = registry().unwrap().decode_any(&wire).unwrap();

	assert_eq!(schema.name(), "TaskSpecRecord");
	assert_eq!(TaskSpecRecord::from_fields(&fields), Ok(task_spec()));
}

#[test]
fn sniffing_rejects_unknown_discriminators() {
	let mut wire = task_spec().to_wire().unwrap();
	wire[0] ^= 0xff;

	assert!(matches!(
		registry().unwrap().decode_any(&wire),
		Err(LayoutError::UnrecognizedDiscriminator { .. })
	));
	assert!(registry().unwrap().identify(&wire[..4]).is_none());
}

#[test]
fn registering_twice_fails() {
	let mut registry = build_registry().unwrap();
	let error = registry.register(SbState::schema()).unwrap_err();
	assert!(matches!(error, LayoutError::DuplicateSchema { .. }));
	assert_eq!(registry.len(), 12);
}

#[test]
fn shared_registry_is_read_concurrently() {
	let wire = OracleHeartbeat {
		params: OracleHeartbeatParams { permission_bump: 9 },
	}
	.to_wire()
	.unwrap();

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let wire = wire.clone();
			thread::spawn(move || {
				let registry = registry().unwrap_or_else(|error| panic!("{error}"));
				let (schema, _) = registry
					.decode_any(&wire)
					.unwrap_or_else(|error| panic!("{error}"));
				(schema.name().to_owned(), core::ptr::from_ref(registry) as usize)
			})
		})
		.collect();

	let results: Vec<_> = handles
		.into_iter()
		.map(|handle| handle.join().unwrap())
		.collect();

	assert!(results.iter().all(|(name, _)| name == "oracle_heartbeat"));
	assert!(results.windows(2).all(|pair| pair[0].1 == pair[1].1));
}

#[test]
fn trailing_padding_is_reported_not_rejected() {
	let mut wire = task_spec().to_wire().unwrap();
	wire.extend_from_slice(&[0, 0, 3]);

	let schema = TaskSpecRecord::schema();
	assert_eq!(TaskSpecRecord::from_wire(&wire), Ok(task_spec()));

	let inspection = schema.inspect_wire(&wire).unwrap();
	assert_eq!(inspection.consumed, 40);
	assert_eq!(inspection.trailing, 3);
	assert!(inspection.trailing_nonzero);
}

#[test]
fn oracle_projection_snapshot() {
	let mut name = [0; 32];
	name[..4].copy_from_slice(b"node");

	let oracle = OracleAccountData {
		name,
		metadata: [0; 128],
		oracle_authority: Pubkey::new_from_array([1; 32]),
		last_heartbeat: -1,
		num_in_use: 2,
		token_account: Pubkey::new_from_array([1; 32]),
		queue_pubkey: Pubkey::new_from_array([1; 32]),
		metrics: OracleMetrics {
			consecutive_success: 5,
			total_success: u128::MAX,
			..OracleMetrics::default()
		},
		bump: 255,
		ebuf: [0; 255],
	};

	let json = OracleAccountData::struct_layout()
		.project(&oracle.to_fields())
		.unwrap();

	insta::assert_json_snapshot!(json["metrics"], @r#"
	{
	  "consecutive_success": "5",
	  "consecutive_error": "0",
	  "consecutive_disagreement": "0",
	  "consecutive_late_response": "0",
	  "consecutive_failure": "0",
	  "total_success": "340282366920938463463374607431768211455",
	  "total_error": "0",
	  "total_disagreement": "0",
	  "total_late_response": "0"
	}
	"#);
	assert_eq!(json["oracle_authority"], "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi");
	assert_eq!(json["last_heartbeat"], "-1");
	assert_eq!(json["num_in_use"], 2);
	assert_eq!(json["name"][0], u32::from(b'n'));
}
