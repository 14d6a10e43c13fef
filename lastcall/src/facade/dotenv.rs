use crate::Pivot;
use std::sync::Once;
use tracing::debug;

const FILE_DOT_ENV_LOCAL: &str = ".env.local";
const FILE_DOT_ENV_GLOBAL: &str = ".env";

/// A facade for loading environment variables from `.env` files.
///
/// Variables are loaded from `.env.local` and `.env` files located in the
/// application's [pivot directory][pivot], before the configuration is
/// assembled, so that they can feed its environment overrides (e.g.
/// `APP_TRACING__MANAGER=immediate`).
///
/// Use [`tap`] for a safe, one-time load operation, or [`load`] to perform the
/// operation directly.
///
/// [pivot]: Pivot
pub struct DotEnv;

impl DotEnv {
    /// Ensures environment variables from dot-env files are loaded.
    ///
    /// This function guarantees that the loading operation is performed at most
    /// once during the application's lifecycle. Subsequent calls will have no
    /// effect.
    ///
    /// This is the recommended method for applying dot-env configuration in most
    /// scenarios. It internally calls [`load`] on its first invocation.
    ///
    /// [`load`]: DotEnv::load
    pub fn tap() {
        static INIT: Once = Once::new();

        INIT.call_once(Self::load);
    }

    /// Loads environment variables from dot-env files into the environment.
    ///
    /// This method does not override any environment variables that are already
    /// set. It only loads values for variables that are not currently present in
    /// the process's environment.
    ///
    /// ## Precedence
    ///
    /// The files are loaded in the following order, with variables from earlier
    /// files taking precedence:
    ///
    /// 1. `.env.local`
    /// 2. `.env`
    ///
    /// Both files are searched for in the application's [pivot directory][pivot].
    /// If a file is not found, it is silently ignored. If the pivot directory
    /// cannot be resolved, nothing is loaded.
    ///
    /// [pivot]: Pivot
    pub fn load() {
        let Ok(pivot) = Pivot::resolve() else {
            return;
        };

        for file_name in [FILE_DOT_ENV_LOCAL, FILE_DOT_ENV_GLOBAL] {
            if let Err(error) = dotenvy::from_path(pivot.join(file_name)) {
                debug!(file = file_name, %error, "Skipping dot-env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scopeguard::defer;
    use std::fs;

    const FROM_ENV: &str = "LASTCALL_DOTENV_FROM_ENV";
    const FROM_LOCAL: &str = "LASTCALL_DOTENV_FROM_LOCAL";
    const FROM_GLOBAL: &str = "LASTCALL_DOTENV_FROM_GLOBAL";
    const NOWHERE: &str = "LASTCALL_DOTENV_NOWHERE";

    #[test]
    fn tap_loads_once_without_overriding() {
        // Given
        let pivot = Pivot::resolve().unwrap();
        let local = pivot.join(FILE_DOT_ENV_LOCAL);
        let global = pivot.join(FILE_DOT_ENV_GLOBAL);
        unsafe { std::env::set_var(FROM_ENV, "env") }
        write_files("loc", "glo");
        defer! {
            let _ = fs::remove_file(&local);
            let _ = fs::remove_file(&global);
            unsafe {
                for name in [FROM_ENV, FROM_LOCAL, FROM_GLOBAL] {
                    std::env::remove_var(name);
                }
            }
        }

        // When
        DotEnv::tap();

        // Then
        assert_eq!(read(FROM_ENV), "env");
        assert_eq!(read(FROM_LOCAL), "loc");
        assert_eq!(read(FROM_GLOBAL), "glo");
        assert_eq!(read(NOWHERE), "");

        // When
        write_files("new_loc", "new_glo");
        DotEnv::tap();

        // Then
        assert_eq!(read(FROM_LOCAL), "loc");
        assert_eq!(read(FROM_GLOBAL), "glo");
    }

    fn write_files(local_value: &str, global_value: &str) {
        let pivot = Pivot::resolve().unwrap();

        fs::write(
            pivot.join(FILE_DOT_ENV_LOCAL),
            format!("{FROM_ENV}={local_value}\n{FROM_LOCAL}={local_value}\n"),
        )
        .unwrap();
        fs::write(
            pivot.join(FILE_DOT_ENV_GLOBAL),
            format!(
                "{FROM_ENV}={global_value}\n{FROM_LOCAL}={global_value}\n{FROM_GLOBAL}={global_value}\n"
            ),
        )
        .unwrap();
    }

    fn read(name: &str) -> String {
        std::env::var(name).unwrap_or_default()
    }
}
