// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client half of the user pool's SRP-6a password verifier.
//!
//! Numbers are hashed in their sign-padded big-endian form: a single zero
//! byte is prepended when the top bit is set. This differs from the
//! length-padding of RFC 5054, so a generic SRP client cannot be reused.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use num::{BigUint, Zero};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// HKDF info string the pool uses for the password-claim key.
const KEY_INFO: &[u8] = b"Caldera Derived Key";

const KEY_LEN: usize = 16;
const SECRET_LEN: usize = 128;

/// RFC 3526 3072-bit MODP prime, most significant word first.
const MODULUS_WORDS: [u32; 96] = [
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xC90F_DAA2, 0x2168_C234, 0xC4C6_628B, 0x80DC_1CD1,
    0x2902_4E08, 0x8A67_CC74, 0x020B_BEA6, 0x3B13_9B22, 0x514A_0879, 0x8E34_04DD,
    0xEF95_19B3, 0xCD3A_431B, 0x302B_0A6D, 0xF25F_1437, 0x4FE1_356D, 0x6D51_C245,
    0xE485_B576, 0x625E_7EC6, 0xF44C_42E9, 0xA637_ED6B, 0x0BFF_5CB6, 0xF406_B7ED,
    0xEE38_6BFB, 0x5A89_9FA5, 0xAE9F_2411, 0x7C4B_1FE6, 0x4928_6651, 0xECE4_5B3D,
    0xC200_7CB8, 0xA163_BF05, 0x98DA_4836, 0x1C55_D39A, 0x6916_3FA8, 0xFD24_CF5F,
    0x8365_5D23, 0xDCA3_AD96, 0x1C62_F356, 0x2085_52BB, 0x9ED5_2907, 0x7096_966D,
    0x670C_354E, 0x4ABC_9804, 0xF174_6C08, 0xCA18_217C, 0x3290_5E46, 0x2E36_CE3B,
    0xE39E_772C, 0x180E_8603, 0x9B27_83A2, 0xEC07_A28F, 0xB5C5_5DF0, 0x6F4C_52C9,
    0xDE2B_CBF6, 0x9558_1718, 0x3995_497C, 0xEA95_6AE5, 0x15D2_2618, 0x98FA_0510,
    0x1572_8E5A, 0x8AAA_C42D, 0xAD33_170D, 0x0450_7A33, 0xA855_21AB, 0xDF1C_BA64,
    0xECFB_8504, 0x58DB_EF0A, 0x8AEA_7157, 0x5D06_0C7D, 0xB397_0F85, 0xA6E1_E4C7,
    0xABF5_AE8C, 0xDB09_33D7, 0x1E8C_94E0, 0x4A25_619D, 0xCEE3_D226, 0x1AD2_EE6B,
    0xF12F_FA06, 0xD98A_0864, 0xD876_0273, 0x3EC8_6A64, 0x521F_2B18, 0x177B_200C,
    0xBBE1_1757, 0x7A61_5D6C, 0x7709_88C0, 0xBAD9_46E2, 0x08E2_4FA0, 0x74E5_AB31,
    0x43DB_5BFC, 0xE0FD_108E, 0x4B82_D120, 0xA93A_D2CA, 0xFFFF_FFFF, 0xFFFF_FFFF,
];

const GENERATOR: u32 = 2;

/// Parameters of a `PASSWORD_VERIFIER` challenge.
#[derive(Debug)]
pub(super) struct PasswordChallenge<'a> {
    /// `USER_ID_FOR_SRP`: the pool's internal user name.
    pub user_id: &'a str,
    /// `SALT`, hex.
    pub salt: &'a str,
    /// `SRP_B`, hex.
    pub server_public: &'a str,
    /// `SECRET_BLOCK`, base64.
    pub secret_block: &'a str,
}

/// One login attempt: the ephemeral secret and the public value sent as
/// `SRP_A`.
pub(super) struct SrpHandshake {
    pool_name: String,
    modulus: BigUint,
    generator: BigUint,
    multiplier: BigUint,
    secret: BigUint,
    public: BigUint,
}

impl SrpHandshake {
    /// Starts a handshake with a fresh random secret.
    ///
    /// `pool_name` is the part of the pool id after the region, e.g.
    /// `i4HRNwzTt` for `us-east-1_i4HRNwzTt`.
    pub(super) fn new(pool_name: &str) -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; SECRET_LEN];
        loop {
            rng.fill_bytes(&mut bytes);
            let handshake = Self::with_secret(pool_name, &BigUint::from_bytes_be(&bytes));
            if !handshake.secret.is_zero() && !handshake.public.is_zero() {
                return handshake;
            }
        }
    }

    fn with_secret(pool_name: &str, secret: &BigUint) -> Self {
        let modulus = BigUint::new(MODULUS_WORDS.iter().rev().copied().collect());
        let generator = BigUint::from(GENERATOR);
        let multiplier = BigUint::from_bytes_be(&sha256(&[pad(&modulus).as_slice(), pad(&generator).as_slice()]));
        let secret = secret % &modulus;
        let public = generator.modpow(&secret, &modulus);

        Self {
            pool_name: pool_name.to_string(),
            modulus,
            generator,
            multiplier,
            secret,
            public,
        }
    }

    /// Returns `SRP_A` as lowercase hex.
    pub(super) fn public_hex(&self) -> String {
        self.public.to_str_radix(16)
    }

    /// Signs the challenge, returning `PASSWORD_CLAIM_SIGNATURE`.
    ///
    /// `timestamp` must be the value sent as `TIMESTAMP`.
    pub(super) fn sign(
        &self,
        challenge: &PasswordChallenge<'_>,
        password: &str,
        timestamp: &str,
    ) -> Result<String, AuthError> {
        let salt = decode_hex("SALT", challenge.salt)?;
        let server_public = BigUint::from_bytes_be(&decode_hex("SRP_B", challenge.server_public)?);
        let secret_block = BASE64
            .decode(challenge.secret_block)
            .map_err(|e| AuthError::UnexpectedResponse(format!("invalid SECRET_BLOCK: {e}")))?;

        let key = self.session_key(challenge.user_id, password, &salt, &server_public)?;

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&key)
            .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;
        mac.update(self.pool_name.as_bytes());
        mac.update(challenge.user_id.as_bytes());
        mac.update(&secret_block);
        mac.update(timestamp.as_bytes());

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    fn session_key(
        &self,
        user_id: &str,
        password: &str,
        salt: &[u8],
        server_public: &BigUint,
    ) -> Result<[u8; KEY_LEN], AuthError> {
        if (server_public % &self.modulus).is_zero() {
            return Err(AuthError::UnexpectedResponse("SRP_B is zero modulo N".to_string()));
        }

        let scrambler = scrambler(&self.public, server_public);
        if scrambler.is_zero() {
            return Err(AuthError::UnexpectedResponse("SRP scrambler is zero".to_string()));
        }

        let x = self.private_key(user_id, password, salt);
        let blinded = (&self.multiplier * self.generator.modpow(&x, &self.modulus)) % &self.modulus;
        let base = (server_public % &self.modulus + &self.modulus - blinded) % &self.modulus;
        let premaster = base.modpow(&(&self.secret + &scrambler * &x), &self.modulus);

        derive_key(&pad(&premaster), &pad(&scrambler))
    }

    /// `x = H(salt | H(pool_name | user_id | ":" | password))`.
    fn private_key(&self, user_id: &str, password: &str, salt: &[u8]) -> BigUint {
        let identity = sha256(&[
            self.pool_name.as_bytes(),
            user_id.as_bytes(),
            b":".as_slice(),
            password.as_bytes(),
        ]);
        BigUint::from_bytes_be(&sha256(&[pad_bytes(salt.to_vec()).as_slice(), identity.as_slice()]))
    }
}

/// Formats the `TIMESTAMP` challenge response, e.g. `Tue Mar 3 05:07:09 UTC 2026`.
pub(super) fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%a %b %-d %H:%M:%S UTC %Y").to_string()
}

fn scrambler(client_public: &BigUint, server_public: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&sha256(&[pad(client_public).as_slice(), pad(server_public).as_slice()]))
}

fn derive_key(premaster: &[u8], scrambler: &[u8]) -> Result<[u8; KEY_LEN], AuthError> {
    let mut key = [0u8; KEY_LEN];
    Hkdf::<Sha256>::new(Some(scrambler), premaster)
        .expand(KEY_INFO, &mut key)
        .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;
    Ok(key)
}

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn pad(value: &BigUint) -> Vec<u8> {
    pad_bytes(value.to_bytes_be())
}

fn pad_bytes(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        bytes.insert(0, 0);
    }
    bytes
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, AuthError> {
    let even;
    let value = if value.len() % 2 == 1 {
        even = format!("0{value}");
        even.as_str()
    } else {
        value
    };
    hex::decode(value).map_err(|e| AuthError::UnexpectedResponse(format!("invalid {field}: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const POOL: &str = "i4HRNwzTt";
    const USER: &str = "6f0d8a1e-user";
    const PASSWORD: &str = "hunter2";
    const SALT: &str = "9f3c2be1d07a44";

    fn client() -> SrpHandshake {
        SrpHandshake::with_secret(POOL, &BigUint::from_bytes_be(&[0x5a; SECRET_LEN]))
    }

    /// Server side of the exchange for the same password.
    fn server_key(client: &SrpHandshake, server_secret: &BigUint) -> (BigUint, [u8; KEY_LEN]) {
        let n = &client.modulus;
        let salt = decode_hex("SALT", SALT).unwrap();
        let verifier = client
            .generator
            .modpow(&client.private_key(USER, PASSWORD, &salt), n);
        let server_public =
            (&client.multiplier * &verifier + client.generator.modpow(server_secret, n)) % n;

        let u = scrambler(&client.public, &server_public);
        let premaster = ((&client.public * verifier.modpow(&u, n)) % n).modpow(server_secret, n);
        let key = derive_key(&pad(&premaster), &pad(&u)).unwrap();
        (server_public, key)
    }

    #[test]
    fn modulus_is_3072_bits() {
        let client = client();
        assert_eq!(client.modulus.bits(), 3072);
        assert_eq!(client.public, client.generator.modpow(&client.secret, &client.modulus));
    }

    #[test]
    fn client_and_server_derive_the_same_key() {
        let client = client();
        let salt = decode_hex("SALT", SALT).unwrap();
        let (server_public, expected) = server_key(&client, &BigUint::from_bytes_be(&[0x33; 64]));

        let key = client
            .session_key(USER, PASSWORD, &salt, &server_public)
            .unwrap();

        assert_eq!(key, expected);
    }

    #[test]
    fn wrong_password_derives_another_key() {
        let client = client();
        let salt = decode_hex("SALT", SALT).unwrap();
        let (server_public, expected) = server_key(&client, &BigUint::from_bytes_be(&[0x33; 64]));

        let key = client
            .session_key(USER, "hunter3", &salt, &server_public)
            .unwrap();

        assert_ne!(key, expected);
    }

    #[test]
    fn signature_covers_pool_user_block_and_timestamp() {
        let client = client();
        let (server_public, key) = server_key(&client, &BigUint::from_bytes_be(&[0x17; 64]));
        let block = BASE64.encode(b"opaque secret block");
        let stamp = "Tue Mar 3 05:07:09 UTC 2026";

        let challenge = PasswordChallenge {
            user_id: USER,
            salt: SALT,
            server_public: &server_public.to_str_radix(16),
            secret_block: &block,
        };
        let signature = client.sign(&challenge, PASSWORD, stamp).unwrap();

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&key).unwrap();
        mac.update(format!("{POOL}{USER}opaque secret block{stamp}").as_bytes());
        assert_eq!(signature, BASE64.encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn zero_server_public_is_rejected() {
        let client = client();
        let n_hex = client.modulus.to_str_radix(16);
        let challenge = PasswordChallenge {
            user_id: USER,
            salt: SALT,
            server_public: &n_hex,
            secret_block: "AAAA",
        };

        let err = client.sign(&challenge, PASSWORD, "now").unwrap_err();
        assert!(matches!(err, AuthError::UnexpectedResponse(_)));
    }

    #[test]
    fn malformed_challenge_fields_are_reported() {
        let client = client();
        let challenge = PasswordChallenge {
            user_id: USER,
            salt: "zz",
            server_public: "02",
            secret_block: "AAAA",
        };
        let err = client.sign(&challenge, PASSWORD, "now").unwrap_err();
        assert!(matches!(err, AuthError::UnexpectedResponse(ref m) if m.contains("SALT")));
    }

    #[test]
    fn sign_padding() {
        assert_eq!(pad(&BigUint::from(0x7fu32)), vec![0x7f]);
        assert_eq!(pad(&BigUint::from(0x80u32)), vec![0x00, 0x80]);
        assert_eq!(decode_hex("SALT", "abc").unwrap(), vec![0x0a, 0xbc]);
    }

    #[test]
    fn timestamp_has_no_day_padding() {
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 5, 7, 9).unwrap();
        assert_eq!(timestamp(now), "Tue Mar 3 05:07:09 UTC 2026");

        let now = Utc.with_ymd_and_hms(2026, 10, 19, 23, 0, 1).unwrap();
        assert_eq!(timestamp(now), "Mon Oct 19 23:00:01 UTC 2026");
    }
}
