/// Declare a configuration record together with its field table.
///
/// Every field carries its default text after `=`, optionally followed by
/// `env = "..."` and `required = "..."`. The field identifier is the
/// canonical name used for defaults, file keys and introspection. The
/// generated struct derives `Debug`, `Clone` and `Default`.
///
/// ```
/// layerfig_config::configurable! {
///     pub struct ServerConfig {
///         pub listen_addr: String = "127.0.0.1:8080", env = "LISTEN_ADDR", required = "true";
///         pub workers: i64 = "4", env = "WORKERS";
///         pub verbose: bool = "false";
///     }
/// }
///
/// let mut config = ServerConfig::default();
/// layerfig_config::resolve_into(
///     &mut config,
///     &layerfig_config::ResolveOptions::new()
///         .with_environment(layerfig_config::EnvironmentProvider::from_pairs([("WORKERS", "8")]))
///         .with_read_mode(layerfig_config::ReadMode::EnvOnly),
/// )
/// .unwrap();
/// assert_eq!(config.workers, 8);
/// assert_eq!(config.listen_addr, "127.0.0.1:8080");
/// ```
#[macro_export]
macro_rules! configurable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $default:literal
                    $(, env = $env:literal)?
                    $(, required = $required:literal)?
            );* $(;)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Configurable for $name {
            fn fields() -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $(
                        $crate::FieldSpec::new(stringify!($field), stringify!($ty))
                            .default_text($default)
                            $(.env($env))?
                            $(.required($required))?
                    ),*
                ];
                FIELDS
            }

            fn apply(
                &mut self,
                name: &str,
                value: $crate::FieldValue,
            ) -> ::std::result::Result<(), $crate::ConfigError> {
                $(
                    if name == stringify!($field) {
                        return $crate::assign_scalar(&mut self.$field, name, value);
                    }
                )*
                Err($crate::ConfigError::InvalidTarget {
                    reason: format!("unknown field {name}"),
                })
            }

            fn value(&self, name: &str) -> ::std::option::Option<$crate::FieldValue> {
                $(
                    if name == stringify!($field) {
                        return Some($crate::ScalarField::to_value(&self.$field));
                    }
                )*
                None
            }
        }
    };
}
