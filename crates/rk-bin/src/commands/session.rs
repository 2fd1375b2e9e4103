// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session commands: `captcha`, `login`, `whoami`, `logout`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rk_core::Credentials;

use crate::app::App;
use crate::cli::{CaptchaArgs, LoginArgs};
use crate::error::{BinError, BinResult};

/// Fetches a captcha and prints its id.
pub async fn captcha(app: &App, args: CaptchaArgs) -> BinResult<()> {
    let captcha = app.session().fetch_captcha().await?;
    println!("Captcha id: {}", captcha.captcha_id);

    match args.output {
        Some(path) => {
            let image = decode_data_uri(&captcha.data)?;
            std::fs::write(&path, image)
                .map_err(|e| BinError::io(e.to_string()).with_context("writing captcha image"))?;
            println!("Image written to {}", path.display());
        }
        None => println!("{}", captcha.data),
    }
    Ok(())
}

/// Logs in and lands on the page the guard picks.
pub async fn login(app: &App, args: LoginArgs) -> BinResult<()> {
    let credentials = Credentials::new(args.username, args.password, args.captcha_id, args.verify_code);
    let session = app.session().login(&credentials).await?;
    println!("Logged in as {} (id {})", session.display_name(), session.user_id());

    let landing = app.navigator().after_login().await?;
    println!("Landing page: {}", landing.location);
    Ok(())
}

/// Prints the signed-in user.
pub async fn whoami(app: &App) -> BinResult<()> {
    app.require_session()?;
    app.session().hydrate().await?;
    let session = app.require_session()?;
    let profile = session.profile();

    println!("User:        {} ({})", profile.display_name(), profile.username);
    println!("Id:          {}", profile.id);
    if let Some(dept) = profile.department_id {
        println!("Department:  {}", dept);
    }
    if !profile.role_id_list.is_empty() {
        let roles: Vec<String> = profile.role_id_list.iter().map(i64::to_string).collect();
        println!("Roles:       {}", roles.join(", "));
    }
    println!("Admin:       {}", if app.session().is_admin() { "yes" } else { "no" });
    if let Some(expires) = session.tokens().access_expires_at {
        println!("Token until: {}", expires);
    }
    Ok(())
}

/// Ends the session.
pub async fn logout(app: &App) -> BinResult<()> {
    if !app.session().is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }
    app.session().logout().await;
    println!("Logged out");
    Ok(())
}

/// Decodes a `data:image/png;base64,...` URI, or bare base64.
pub(crate) fn decode_data_uri(data: &str) -> BinResult<Vec<u8>> {
    let payload = data
        .split_once("base64,")
        .map(|(_, encoded)| encoded)
        .unwrap_or(data);
    STANDARD
        .decode(payload.trim())
        .map_err(|e| BinError::io(format!("Invalid captcha image: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_uri() {
        let bytes = decode_data_uri("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_decode_bare_base64() {
        assert_eq!(decode_data_uri("aGk=").unwrap(), b"hi");
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_data_uri("data:image/png;base64,***").is_err());
    }
}
