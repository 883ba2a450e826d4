use std::path::Path;

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// RC4 key length used for new encryption dictionaries.
const KEY_BITS: usize = 128;

/// Encrypts `doc` in place; the password opens the file and owns it.
pub fn encrypt_document(doc: &mut Document, password: &str) -> Result<()> {
    ensure_file_id(doc);
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &*doc,
        owner_password: password,
        user_password: password,
        key_length: KEY_BITS,
        permissions: Permissions::all(),
    })
    .map_err(|e| Error::Malformed(format!("cannot set up encryption: {e}")))?;
    doc.encrypt(&state)
        .map_err(|e| Error::Malformed(format!("encryption failed: {e}")))?;
    Ok(())
}

pub fn encrypt_file(input: &Path, password: &str, output: &Path) -> Result<()> {
    let mut doc = super::load(input)?;
    // Streams are compressed first; the ciphertext is written as is.
    doc.compress();
    encrypt_document(&mut doc, password)?;
    doc.save(output)?;
    tracing::info!(output = %output.display(), "encrypted document");
    Ok(())
}

/// Writes a decrypted copy of `input`. A wrong password produces no file.
pub fn decrypt_file(input: &Path, password: &str, output: &Path) -> Result<()> {
    let mut doc = super::load(input)?;
    if !doc.is_encrypted() {
        return Err(Error::NotEncrypted);
    }
    if let Err(e) = doc.decrypt(password) {
        tracing::warn!(error = %e, "decryption rejected");
        return Err(Error::WrongPassword);
    }
    doc.trailer.remove(b"Encrypt");
    doc.prune_objects();
    super::save(&mut doc, output)?;
    tracing::info!(output = %output.display(), "decrypted document");
    Ok(())
}

/// Encryption keys are derived from the first `/ID` string, which
/// generated documents often lack.
fn ensure_file_id(doc: &mut Document) {
    if doc.trailer.has(b"ID") {
        return;
    }
    let mut hasher = Sha256::new();
    hasher.update(time::OffsetDateTime::now_utc().unix_timestamp_nanos().to_le_bytes());
    hasher.update(doc.max_id.to_le_bytes());
    let id = hasher.finalize()[..16].to_vec();
    let id = Object::String(id, StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![id.clone(), id]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::fixtures;

    #[test]
    fn encrypt_then_decrypt_keeps_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "plain.pdf", fixtures::document(3, "E"));
        let locked = dir.path().join("locked.pdf");
        let unlocked = dir.path().join("unlocked.pdf");

        encrypt_file(&input, "s3cret", &locked).unwrap();
        assert!(Document::load(&locked).unwrap().is_encrypted());

        decrypt_file(&locked, "s3cret", &unlocked).unwrap();
        let doc = Document::load(&unlocked).unwrap();
        assert!(!doc.is_encrypted());
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn wrong_password_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "plain.pdf", fixtures::document(1, "E"));
        let locked = dir.path().join("locked.pdf");
        let unlocked = dir.path().join("unlocked.pdf");

        encrypt_file(&input, "right", &locked).unwrap();
        assert!(matches!(
            decrypt_file(&locked, "wrong", &unlocked),
            Err(Error::WrongPassword)
        ));
        assert!(!unlocked.exists());
    }

    #[test]
    fn plain_file_cannot_be_decrypted() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixtures::write(dir.path(), "plain.pdf", fixtures::document(1, "E"));
        assert!(matches!(
            decrypt_file(&input, "x", &dir.path().join("out.pdf")),
            Err(Error::NotEncrypted)
        ));
    }

    #[test]
    fn file_id_is_added_once() {
        let mut doc = fixtures::document(1, "E");
        ensure_file_id(&mut doc);
        let first = format!("{:?}", doc.trailer.get(b"ID").unwrap());
        ensure_file_id(&mut doc);
        assert_eq!(format!("{:?}", doc.trailer.get(b"ID").unwrap()), first);
    }
}
