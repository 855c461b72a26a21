//! Additive homomorphic encryption over polynomial rings (BFV).
//!
//! The crate implements the Brakerski/Fan-Vercauteren scheme restricted to
//! its additive fragment: key generation, integer encoding, public-key
//! encryption, homomorphic addition and subtraction (ciphertext and
//! plaintext operands), and decryption guarded by an explicit noise
//! budget. There is no ciphertext multiplication, relinearization or
//! bootstrapping.
//!
//! All arithmetic lives in Z_q[x]/(x^N + 1) with q a product of NTT
//! friendly 64-bit primes; ring multiplications run through per-prime
//! negacyclic transforms and are recombined by CRT.
//!
//! A typical session:
//!
//! ```
//! use bfv_core::{
//!     BfvContext, Decryptor, EncryptionParameters, Encryptor, Evaluator,
//!     IntegerEncoder, KeyGenerator,
//! };
//! use bfv_core::params::suggest_coeff_modulus;
//!
//! # fn main() -> bfv_core::Result<()> {
//! let chain = suggest_coeff_modulus(1024, &[50])?;
//! let params = EncryptionParameters::new(1024, chain, 65537)?;
//! let ctx = BfvContext::new(params)?;
//!
//! let mut rng = rand::thread_rng();
//! let (sk, pk) = KeyGenerator::new(ctx.clone()).generate(&mut rng);
//! let encoder = IntegerEncoder::new(ctx.clone());
//! let encryptor = Encryptor::new(ctx.clone(), pk)?;
//! let decryptor = Decryptor::new(ctx.clone(), sk)?;
//! let evaluator = Evaluator::new(ctx);
//!
//! let a = encryptor.encrypt(&encoder.encode(120)?, &mut rng)?;
//! let b = encryptor.encrypt(&encoder.encode(-20)?, &mut rng)?;
//! let sum = evaluator.add_ciphertexts(&[a, b])?;
//! assert_eq!(encoder.decode(&decryptor.decrypt(&sum)?), 100);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, missing_docs)]

pub mod arith;
pub mod ciphertext;
pub mod context;
pub mod decryptor;
pub mod encoder;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod keys;
pub mod ntt;
pub mod params;
pub mod plaintext;
pub mod polynomial;
pub mod sampling;

pub use ciphertext::Ciphertext;
pub use context::BfvContext;
pub use decryptor::Decryptor;
pub use encoder::IntegerEncoder;
pub use encryptor::Encryptor;
pub use error::{BfvError, Result};
pub use evaluator::Evaluator;
pub use keys::{KeyGenerator, PublicKey, SecretKey};
pub use params::EncryptionParameters;
pub use plaintext::Plaintext;
pub use polynomial::RingPoly;
