//! [`SwarmThresholdScheme`], the implementation of
//! [`TransformableThreshold`].
//!
//! Besides the trait operations it offers coalition-wide signature
//! collection, diagnostic verification and signature reconstruction.

use core::{fmt::Debug, marker::PhantomData};
use std::collections::HashSet;

use rand_core::RngCore;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator,
};
use tracing::{debug, info, instrument};

use crate::{
    AggregatedSignature, AggregatorSecret, Coalition, CurvePoint, ElGamalCiphertext, ElGamalKeyPair,
    Exponent, FieldElement, Fr, KeyMaterial, PairingBackend, PartialSignature, PublicParameters,
    SignerRegistry, SignerShare, TransformableThreshold, VerificationMode, VerificationReport,
    arith::random_unit,
    config::SchemeConfig,
    errors::{BackendError, Error},
    exp, hash_message, hash_to_coprime,
    rts::{elgamal::sample_base, keys::check_identifiers},
};

/// The swarm threshold signature scheme over a pairing backend.
#[derive(Clone, Debug)]
pub struct SwarmThresholdScheme<B: PairingBackend> {
    config: SchemeConfig,
    _phantom: PhantomData<B>,
}

/// Contributions with the aggregator's blinding removed, aligned with the
/// resolved coalition.
struct Unblinded<B: PairingBackend<Scalar = Fr>> {
    sigs: Vec<B::G1>,
    lambdas: Vec<Fr>,
    ladder_keys: Vec<B::G2>,
    group_key: B::G2,
    coalition: Coalition,
}

impl<B: PairingBackend<Scalar = Fr>> SwarmThresholdScheme<B> {
    /// Creates a scheme instance after validating `config`.
    pub fn new(config: SchemeConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            _phantom: PhantomData,
        })
    }

    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// Key generation with caller-supplied signer identifiers.
    ///
    /// Identifier `ids[i]` is assigned registry index `i`. Identifiers must be
    /// non-zero and pairwise distinct.
    #[instrument(
        level = "info",
        skip_all,
        fields(signers = ids.len(), max_threshold = params.max_threshold())
    )]
    pub fn keygen_with_ids<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        ids: &[Fr],
    ) -> Result<KeyMaterial<B>, Error> {
        if ids.len() != params.swarm_size() {
            return Err(Error::InvalidParameter(format!(
                "expected {} identifiers, got {}",
                params.swarm_size(),
                ids.len()
            )));
        }
        check_identifiers(ids)?;

        let slots = params.max_threshold() - 1;
        let coefficients: Vec<(Fr, Fr)> = (0..slots)
            .map(|_| (<Fr as FieldElement>::random(rng), <Fr as FieldElement>::random(rng)))
            .collect();
        let group_keys = ladder::<B>(params.p2(), coefficients.iter().map(|(_, b)| *b));

        let randomness: Vec<Vec<Exponent>> = ids
            .iter()
            .map(|_| (0..slots).map(|_| Exponent::random(rng)).collect())
            .collect();

        let shares: Vec<SignerShare<B>> = ids
            .par_iter()
            .zip(randomness.into_par_iter())
            .enumerate()
            .map(|(index, (id, us))| {
                let evaluations: Vec<Fr> = coefficients.iter().map(|(d, b)| *d * id + b).collect();
                let ciphertexts = evaluations
                    .iter()
                    .zip(us.iter())
                    .map(|(f, u)| ElGamalCiphertext::encrypt_with(params.g(), params.beta(), f, u))
                    .collect();
                let signer_ladder = ladder::<B>(params.p2(), evaluations.iter().copied());
                SignerShare::new(index, *id, ciphertexts, signer_ladder)
            })
            .collect();

        let registry = SignerRegistry::from_shares(&shares)?;
        info!(signers = shares.len(), "generated signer shares");
        Ok(KeyMaterial {
            params: params.with_group_keys(group_keys),
            shares,
            registry,
        })
    }

    /// Signs with every coalition member found in `shares`, in parallel.
    ///
    /// Shares outside the coalition are ignored.
    #[instrument(level = "info", skip_all, fields(coalition = coalition.len(), threshold))]
    pub fn collect_partial_signatures(
        &self,
        params: &PublicParameters<B>,
        shares: &[SignerShare<B>],
        coalition: &Coalition,
        threshold: usize,
        message: &[u8],
    ) -> Result<Vec<PartialSignature<B>>, Error> {
        let selected: Vec<&SignerShare<B>> = coalition
            .indices()
            .iter()
            .filter_map(|&index| shares.iter().find(|share| share.index() == index))
            .collect();
        if selected.len() != coalition.len() {
            return Err(Error::NotEnoughShares {
                required: coalition.len(),
                provided: selected.len(),
            });
        }
        selected
            .par_iter()
            .map(|share| self.sign(params, share, coalition, threshold, message))
            .collect()
    }

    /// Exact verification with the list of contributors whose individual
    /// check failed.
    #[instrument(level = "info", skip_all, fields(contributors = sigma.len()))]
    pub fn verify_detailed(
        &self,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
        message: &[u8],
    ) -> Result<VerificationReport, Error> {
        let unblinded = self.unblind(params, registry, sigma, verifier)?;
        let h = hash_message::<B>(message);

        let verdicts = (0..unblinded.sigs.len())
            .into_par_iter()
            .map(|i| {
                B::pairing_eq(
                    &unblinded.sigs[i],
                    params.p2(),
                    &h.mul_scalar(&unblinded.lambdas[i]),
                    &unblinded.ladder_keys[i],
                )
            })
            .collect::<Result<Vec<bool>, BackendError>>()?;

        let rejected_signers: Vec<usize> = unblinded
            .coalition
            .indices()
            .iter()
            .zip(verdicts.iter())
            .filter(|(_, ok)| !**ok)
            .map(|(index, _)| *index)
            .collect();
        for signer in &rejected_signers {
            debug!(signer, "partial signature rejected");
        }

        let aggregate_valid = aggregate_check::<B>(params, &unblinded, &h)?;
        if !aggregate_valid {
            debug!("aggregate signature does not match group key");
        }
        Ok(VerificationReport {
            accepted: aggregate_valid && rejected_signers.is_empty(),
            aggregate_valid,
            rejected_signers,
        })
    }

    /// Verifies in the requested mode.
    pub fn verify_with_mode<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
        message: &[u8],
        mode: VerificationMode,
    ) -> Result<bool, Error> {
        match mode {
            VerificationMode::Exact => self.verify(params, registry, sigma, verifier, message),
            VerificationMode::Batch => {
                self.batch_verify(rng, params, registry, sigma, verifier, message)
            }
        }
    }

    /// Returns the unblinded threshold signature `∑ sig_i`.
    ///
    /// Any valid coalition of the same size yields the same point for the
    /// same message.
    pub fn reconstruct_signature(
        &self,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
    ) -> Result<B::G1, Error> {
        let unblinded = self.unblind(params, registry, sigma, verifier)?;
        Ok(sum::<B>(&unblinded.sigs))
    }

    /// Factors `k_i = (aux_i^hash)^-1` that strip the session blinding.
    pub(crate) fn unblinding_factors(
        &self,
        params: &PublicParameters<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
    ) -> Result<Vec<Fr>, Error> {
        let shared = exp(params.beta(), verifier.secret());
        let hash = hash_to_coprime(&shared, &self.config.coprime_hash)?;
        let mut factors: Vec<Fr> = sigma.aux.iter().map(|aux| exp(aux, &hash)).collect();
        <Fr as FieldElement>::batch_inversion(&mut factors)?;
        Ok(factors)
    }

    fn unblind(
        &self,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
    ) -> Result<Unblinded<B>, Error> {
        let threshold = sigma.len();
        let ladder_index = params.ladder_index(threshold)?;
        let set = sigma.signer_set()?;
        if set.indices() != sigma.signers() {
            return Err(Error::InvalidParameter(
                "contributors are not in registry order".into(),
            ));
        }
        let coalition = registry.resolve(&set)?;
        let ladder_keys = registry.ladder_keys(&coalition, ladder_index)?;
        let group_key = *params.group_key(threshold)?;
        let lambdas = coalition.lagrange_coefficients()?;

        let factors = self.unblinding_factors(params, sigma, verifier)?;
        let sigs = sigma
            .sigs
            .iter()
            .zip(factors.iter())
            .map(|(sig, k)| sig.mul_scalar(k))
            .collect();

        Ok(Unblinded {
            sigs,
            lambdas,
            ladder_keys,
            group_key,
            coalition,
        })
    }

    /// Random batch weight of `batch_weight_bits` bits; zero maps to one.
    fn batch_weight<R: RngCore + ?Sized>(&self, rng: &mut R) -> Fr {
        let raw = (u128::from(rng.next_u64()) << 64) | u128::from(rng.next_u64());
        let bits = self.config.batch_weight_bits;
        let weight = if bits >= 128 { raw } else { raw & ((1u128 << bits) - 1) };
        <Fr as FieldElement>::from_u128(weight.max(1))
    }
}

impl<B: PairingBackend<Scalar = Fr>> TransformableThreshold<B> for SwarmThresholdScheme<B> {
    #[instrument(
        level = "info",
        skip_all,
        fields(
            swarm_size = self.config.swarm_size,
            max_threshold = self.config.max_threshold
        )
    )]
    fn setup<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(PublicParameters<B>, AggregatorSecret), Error> {
        let p2 = B::G2::generator().mul_scalar(&random_unit(rng, false)?);
        let g = sample_base(rng)?;
        let alpha = Exponent::random(rng);
        let beta = exp(&g, &alpha);
        let params = PublicParameters::new(
            p2,
            g,
            beta,
            self.config.swarm_size,
            self.config.max_threshold,
        );
        Ok((params, AggregatorSecret::new(alpha)))
    }

    fn keygen<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
    ) -> Result<KeyMaterial<B>, Error> {
        let mut ids = Vec::with_capacity(params.swarm_size());
        let mut seen = HashSet::with_capacity(params.swarm_size());
        while ids.len() < params.swarm_size() {
            let id = random_unit(rng, false)?;
            if seen.insert(FieldElement::to_repr(&id)) {
                ids.push(id);
            }
        }
        self.keygen_with_ids(rng, params, &ids)
    }

    #[instrument(level = "trace", skip_all, fields(signer = share.index(), threshold))]
    fn sign(
        &self,
        params: &PublicParameters<B>,
        share: &SignerShare<B>,
        coalition: &Coalition,
        threshold: usize,
        message: &[u8],
    ) -> Result<PartialSignature<B>, Error> {
        let slots = params.ladder_index(threshold)? + 1;
        if coalition.len() != threshold {
            return Err(Error::CoalitionMismatch {
                expected: threshold,
                actual: coalition.len(),
            });
        }
        let position = coalition.position(share.index()).ok_or_else(|| {
            Error::InvalidParameter(format!("signer {} is not in the coalition", share.index()))
        })?;
        if coalition.ids()[position] != *share.id() {
            return Err(Error::InvalidParameter(format!(
                "coalition identifier of signer {} does not match its share",
                share.index()
            )));
        }
        let used = share.ciphertexts().get(..slots).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "share {} holds fewer than {slots} slots",
                share.index()
            ))
        })?;

        let one = <Fr as FieldElement>::one();
        let (cj, sj) = used
            .iter()
            .fold((one, one), |(c1, c2), ct| (c1 * ct.c1(), c2 * ct.c2()));
        let lambda = coalition.lagrange_coefficient(position)?;
        let sig = hash_message::<B>(message).mul_scalar(&(sj * lambda));

        Ok(PartialSignature {
            signer: share.index(),
            cj,
            sig,
        })
    }

    #[instrument(level = "info", skip_all, fields(contributors = partials.len()))]
    fn aggregate<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        secret: &AggregatorSecret,
        partials: &[PartialSignature<B>],
        verifier_public: &Fr,
    ) -> Result<AggregatedSignature<B>, Error> {
        params.check_threshold(partials.len())?;
        let mut ordered: Vec<&PartialSignature<B>> = partials.iter().collect();
        ordered.sort_by_key(|p| p.signer);
        if ordered.windows(2).any(|w| w[0].signer == w[1].signer) {
            return Err(Error::DuplicateSigner);
        }
        if let Some(p) = ordered.iter().find(|p| p.signer >= params.swarm_size()) {
            return Err(Error::UnknownSigner(p.signer));
        }

        let alpha = secret.alpha();
        let shared = exp(verifier_public, alpha);
        let rk = alpha.mul(&hash_to_coprime(&shared, &self.config.coprime_hash)?.invert()?);

        let e = Exponent::random(rng);
        let ge = exp(params.g(), &e);
        let beta_e = exp(params.beta(), &e);

        Ok(AggregatedSignature {
            aux: ordered.iter().map(|p| exp(&(p.cj * ge), &rk)).collect(),
            sigs: ordered.iter().map(|p| p.sig.mul_scalar(&beta_e)).collect(),
            signers: ordered.iter().map(|p| p.signer).collect(),
        })
    }

    fn verify(
        &self,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
        message: &[u8],
    ) -> Result<bool, Error> {
        self.verify_detailed(params, registry, sigma, verifier, message)
            .map(|report| report.accepted)
    }

    #[instrument(level = "info", skip_all, fields(contributors = sigma.len()))]
    fn batch_verify<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
        message: &[u8],
    ) -> Result<bool, Error> {
        let unblinded = self.unblind(params, registry, sigma, verifier)?;
        let h = hash_message::<B>(message);

        let deltas: Vec<Fr> = (0..unblinded.sigs.len())
            .map(|_| self.batch_weight(rng))
            .collect();
        let weighted_lambdas: Vec<Fr> = deltas
            .iter()
            .zip(unblinded.lambdas.iter())
            .map(|(delta, lambda)| *delta * lambda)
            .collect();
        let s_batch = B::G1::multi_scalar_multiplication(&unblinded.sigs, &deltas)?;
        let pk_batch =
            B::G2::multi_scalar_multiplication(&unblinded.ladder_keys, &weighted_lambdas)?;

        if !B::pairing_eq(&s_batch, params.p2(), &h, &pk_batch)? {
            debug!("batched partial signature check failed");
            return Ok(false);
        }
        aggregate_check::<B>(params, &unblinded, &h).map_err(Error::from)
    }
}

/// Builds a threshold ladder `L[0] = P2^x_0`, `L[k] = L[k-1]^x_k`.
fn ladder<B: PairingBackend<Scalar = Fr>>(
    p2: &B::G2,
    exponents: impl Iterator<Item = Fr>,
) -> Vec<B::G2> {
    let mut current = *p2;
    exponents
        .map(|x| {
            current = current.mul_scalar(&x);
            current
        })
        .collect()
}

fn sum<B: PairingBackend<Scalar = Fr>>(points: &[B::G1]) -> B::G1 {
    points.iter().fold(B::G1::identity(), |acc, p| acc.add(p))
}

/// `e(∑ sig_i, P2) == e(H(M), GlobalPK[t-2])`.
fn aggregate_check<B: PairingBackend<Scalar = Fr>>(
    params: &PublicParameters<B>,
    unblinded: &Unblinded<B>,
    h: &B::G1,
) -> Result<bool, BackendError> {
    B::pairing_eq(&sum::<B>(&unblinded.sigs), params.p2(), h, &unblinded.group_key)
}
