/// Implement [`StructCodec`](crate::StructCodec) and
/// [`FieldCodec`](crate::FieldCodec) for a plain struct.
///
/// Fields are laid out in declaration order. Every field type must itself
/// implement `FieldCodec`. Attributes (derives, docs) pass through untouched.
///
/// ```ignore
/// record! {
/// 	#[derive(Clone, Debug, PartialEq, Eq)]
/// 	pub struct VaultTransferParams {
/// 		pub state_bump: u8,
/// 		pub amount: u64,
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! record {
	(
		$(#[$meta:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[$field_meta:meta])*
				$field_vis:vis $field:ident : $ty:ty
			),* $(,)?
		}
	) => {
		$(#[$meta])*
		$vis struct $name {
			$(
				$(#[$field_meta])*
				$field_vis $field: $ty,
			)*
		}

		impl $crate::StructCodec for $name {
			fn struct_layout() -> $crate::StructLayout {
				$crate::StructLayout::new_unchecked(vec![
					$((
						::core::stringify!($field).to_owned(),
						<$ty as $crate::FieldCodec>::layout(),
					),)*
				])
			}

			fn to_fields(&self) -> $crate::Fields {
				#[allow(unused_mut)]
				let mut fields = $crate::Fields::new();
				$(
					fields.insert(
						::core::stringify!($field),
						$crate::FieldCodec::to_value(&self.$field),
					);
				)*
				fields
			}

			fn from_fields(fields: &$crate::Fields) -> ::core::result::Result<Self, $crate::LayoutError> {
				let _ = fields;
				::core::result::Result::Ok(Self {
					$($field: $crate::field(fields, ::core::stringify!($field))?,)*
				})
			}
		}

		impl $crate::FieldCodec for $name {
			fn layout() -> $crate::Layout {
				$crate::Layout::Struct(<Self as $crate::StructCodec>::struct_layout())
			}

			fn to_value(&self) -> $crate::Value {
				$crate::Value::Struct($crate::StructCodec::to_fields(self))
			}

			fn from_value(value: &$crate::Value) -> ::core::result::Result<Self, $crate::LayoutError> {
				<Self as $crate::StructCodec>::from_fields(value.as_struct()?)
			}
		}
	};
}

/// Declare a fieldless tagged union with explicit on-chain tags.
///
/// Variants listed in the optional `reserved` block are recognised when
/// decoding but refused when encoding.
///
/// ```ignore
/// marker_enum! {
/// 	pub enum QueueState {
/// 		Active = 1,
/// 		Paused = 2,
/// 	}
/// 	reserved {
/// 		Unset = 0,
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! marker_enum {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident {
			$($(#[$variant_meta:meta])* $variant:ident = $tag:literal),* $(,)?
		}
	) => {
		$crate::marker_enum! {
			$(#[$meta])*
			$vis enum $name {
				$($(#[$variant_meta])* $variant = $tag),*
			}
			reserved {}
		}
	};
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident {
			$($(#[$variant_meta:meta])* $variant:ident = $tag:literal),* $(,)?
		}
		reserved {
			$($(#[$reserved_meta:meta])* $reserved:ident = $reserved_tag:literal),* $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
		#[repr(u8)]
		$vis enum $name {
			$($(#[$reserved_meta])* $reserved = $reserved_tag,)*
			$($(#[$variant_meta])* $variant = $tag,)*
		}

		impl $name {
			/// Tags that decode but never encode.
			pub const RESERVED_TAGS: &'static [u8] = &[$($reserved_tag),*];

			pub const fn tag(self) -> u8 {
				self as u8
			}

			pub const fn name(self) -> &'static str {
				match self {
					$(Self::$reserved => ::core::stringify!($reserved),)*
					$(Self::$variant => ::core::stringify!($variant),)*
				}
			}

			pub const fn from_tag(tag: u8) -> ::core::option::Option<Self> {
				match tag {
					$($reserved_tag => ::core::option::Option::Some(Self::$reserved),)*
					$($tag => ::core::option::Option::Some(Self::$variant),)*
					_ => ::core::option::Option::None,
				}
			}

			pub fn is_reserved(self) -> bool {
				Self::RESERVED_TAGS.contains(&self.tag())
			}

			pub fn enum_layout() -> $crate::EnumLayout {
				$crate::EnumLayout::new_unchecked(vec![
					$($crate::Variant::reserved($reserved_tag, ::core::stringify!($reserved)),)*
					$($crate::Variant::marker($tag, ::core::stringify!($variant)),)*
				])
			}
		}

		impl ::core::fmt::Display for $name {
			fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
				f.write_str(self.name())
			}
		}

		impl $crate::FieldCodec for $name {
			fn layout() -> $crate::Layout {
				$crate::Layout::Enum(Self::enum_layout())
			}

			fn to_value(&self) -> $crate::Value {
				$crate::Value::Enum($crate::EnumValue::marker(self.tag(), self.name()))
			}

			fn from_value(value: &$crate::Value) -> ::core::result::Result<Self, $crate::LayoutError> {
				let variant = value.as_enum()?;
				Self::from_tag(variant.tag).ok_or_else(|| {
					$crate::LayoutError::shape(format!(
						"no `{}` variant has tag {}",
						::core::stringify!($name),
						variant.tag
					))
				})
			}
		}
	};
}

/// Bind a [`StructCodec`](crate::StructCodec) type to its wire identity.
///
/// ```ignore
/// impl_record!(TaskSpecRecord, Account, "TaskSpecRecord", [202, 10, 194, 236, 111, 47, 234, 48]);
/// ```
#[macro_export]
macro_rules! impl_record {
	($ty:ty, $kind:ident, $name:expr, [$($byte:literal),* $(,)?]) => {
		impl $crate::Record for $ty {
			const NAME: &'static str = $name;
			const KIND: $crate::SchemaKind = $crate::SchemaKind::$kind;
			const DISCRIMINATOR: $crate::Discriminator = $crate::Discriminator::new([$($byte),*]);
		}
	};
}

/// Declare the ordered account list of an instruction.
///
/// Each slot names its [`AccountRole`](crate::AccountRole); the generated
/// `to_account_metas` returns the slots in declaration order.
///
/// ```ignore
/// instruction_accounts! {
/// 	pub struct PermissionSetAccounts {
/// 		permission: Writable,
/// 		authority: Signer,
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! instruction_accounts {
	(
		$(#[$meta:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[$field_meta:meta])*
				$field:ident : $role:ident
			),* $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq)]
		$vis struct $name {
			$(
				$(#[$field_meta])*
				pub $field: $crate::Pubkey,
			)*
		}

		impl $name {
			/// Number of accounts the instruction takes.
			pub const LEN: usize = [$(::core::stringify!($field)),*].len();

			/// Account roles in wire order.
			pub const ROLES: &'static [$crate::AccountRole] = &[$($crate::AccountRole::$role),*];

			/// Account metas in wire order.
			pub fn to_account_metas(&self) -> ::std::vec::Vec<$crate::AccountMeta> {
				vec![$($crate::AccountRole::$role.meta(self.$field)),*]
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use crate::*;

	record! {
		#[derive(Clone, Debug, PartialEq, Eq)]
		struct Withdraw {
			state_bump: u8,
			amount: u64,
		}
	}

	record! {
		#[derive(Clone, Debug, PartialEq, Eq)]
		struct Nothing {}
	}

	record! {
		#[derive(Clone, Debug, PartialEq, Eq)]
		struct Wrapped {
			params: Withdraw,
		}
	}

	impl_record!(Wrapped, Instruction, "lease_withdraw", [186, 41, 100, 248, 234, 81, 61, 169]);

	marker_enum! {
		enum Permission {
			Heartbeat = 1,
			VrfRequests = 4,
		}
		reserved {
			PermitNone = 0,
		}
	}

	instruction_accounts! {
		struct Pair {
			target: Writable,
			authority: Signer,
		}
	}

	#[test]
	fn record_fields_follow_declaration_order() {
		let layout = Withdraw::struct_layout();
		assert_eq!(
			layout.fields().map(|(name, _)| name).collect::<Vec<_>>(),
			["state_bump", "amount"]
		);
		assert_eq!(layout.size(), 9);
		assert_eq!(Nothing::struct_layout().size(), 0);
		assert_eq!(Nothing::from_fields(&Fields::new()), Ok(Nothing {}));
	}

	#[test]
	fn record_round_trips_through_wire() {
		let record = Wrapped {
			params: Withdraw {
				state_bump: 255,
				amount: 42,
			},
		};

		let wire = record.to_wire().unwrap();
		assert_eq!(wire.len(), 17);
		assert!(Wrapped::matches_discriminator(&wire));
		assert_eq!(Wrapped::from_wire(&wire), Ok(record));
		assert_eq!(
			Wrapped::DISCRIMINATOR,
			Discriminator::for_instruction("lease_withdraw")
		);
	}

	#[test]
	fn nested_missing_field_has_full_path() {
		let fields = Fields::new().with(
			"params",
			Fields::new().with("state_bump", Value::Unsigned(1)),
		);
		assert_eq!(
			Wrapped::from_fields(&fields),
			Err(LayoutError::MissingField {
				path: "params.amount".into()
			})
		);
	}

	#[test]
	fn marker_enum_tags_and_reserved_variants() {
		assert_eq!(Permission::VrfRequests.tag(), 4);
		assert_eq!(Permission::from_tag(0), Some(Permission::PermitNone));
		assert_eq!(Permission::from_tag(2), None);
		assert!(Permission::PermitNone.is_reserved());
		assert!(!Permission::Heartbeat.is_reserved());
		assert_eq!(Permission::Heartbeat.to_string(), "Heartbeat");

		let layout = Permission::layout();
		assert_eq!(layout.decode(&[0]), Ok(Permission::PermitNone.to_value()));
		assert!(layout.encode(&Permission::PermitNone.to_value()).is_err());
		assert_eq!(layout.encode(&Permission::VrfRequests.to_value()), Ok(vec![4]));
	}

	#[test]
	fn account_list_keeps_order_and_roles() {
		let accounts = Pair {
			target: Pubkey::new_from_array([1; 32]),
			authority: Pubkey::new_from_array([2; 32]),
		};

		assert_eq!(Pair::LEN, 2);
		assert_eq!(Pair::ROLES, [AccountRole::Writable, AccountRole::Signer]);
		assert_eq!(
			accounts.to_account_metas(),
			vec![
				AccountMeta::new(accounts.target, false),
				AccountMeta::new_readonly(accounts.authority, true),
			]
		);
	}
}
