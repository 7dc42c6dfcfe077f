//! Published derivation vectors, checked end to end from mnemonic or seed.

use hex_literal::hex;
use keytree::curve::{ED25519_NAME, NIST256P1_NAME, SECP256K1_NAME};
use keytree::encoding::base58check_decode;
use keytree::{mnemonic, DerivationPath, Error, HasherType, HARDENED_OFFSET};
use keytree_hd::{HdNode, VERSION_XPRV, VERSION_XPUB};

const H: u32 = HARDENED_OFFSET;
const VECTOR1_SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");
const ABANDON: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn path(text: &str) -> DerivationPath {
    text.parse().unwrap()
}

#[test]
fn bip32_vector1_chain() {
    init_tracing();
    let root = HdNode::from_seed(&VECTOR1_SEED, SECP256K1_NAME).unwrap();

    let expected = [
        (
            "m",
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi",
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
        ),
        (
            "m/0'",
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7",
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw",
        ),
        (
            "m/0'/1",
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs",
            "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ",
        ),
    ];

    let mut parent_fingerprint = 0;
    let mut node = root.clone();
    for (i, (text, xprv, xpub)) in expected.iter().enumerate() {
        if i > 0 {
            let last = path(text).iter_raw().last().unwrap();
            parent_fingerprint = node.fingerprint().unwrap();
            node.private_ckd(last).unwrap();
        }
        assert_eq!(node, root.derive_path(&path(text)).unwrap());
        assert_eq!(&node.serialize_private(parent_fingerprint, VERSION_XPRV).unwrap(), xprv);
        assert_eq!(&node.serialize_public(parent_fingerprint, VERSION_XPUB).unwrap(), xpub);
    }
    assert_eq!(root.fingerprint().unwrap(), 0x3442193e);
}

#[test]
fn bip32_vector1_public_branch() {
    // m/0'/1 from the public parent m/0'
    let root = HdNode::from_seed(&VECTOR1_SEED, SECP256K1_NAME).unwrap();
    let hardened = root.derive(H).unwrap();
    let (public, fingerprint) = HdNode::deserialize(
        &hardened.serialize_public(0x3442193e, VERSION_XPUB).unwrap(),
        VERSION_XPUB,
        VERSION_XPRV,
        SECP256K1_NAME,
    )
    .unwrap();
    assert_eq!(fingerprint, 0x3442193e);

    let child = public.derive(1).unwrap();
    assert!(child.private_key().is_none());
    assert_eq!(
        child.serialize_public(hardened.fingerprint().unwrap(), VERSION_XPUB).unwrap(),
        "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
    );
}

#[test]
fn bip39_seed_to_root() {
    let seed = mnemonic::to_seed(ABANDON, "").unwrap();
    assert_eq!(
        seed.as_slice(),
        &hex!(
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1"
            "9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        )[..]
    );

    let root = HdNode::from_seed(seed.as_slice(), SECP256K1_NAME).unwrap();
    assert_eq!(
        root.serialize_private(0, VERSION_XPRV).unwrap(),
        "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu"
    );
    assert_eq!(
        root.serialize_public(0, VERSION_XPUB).unwrap(),
        "xpub661MyMwAqRbcFkPHucMnrGNzDwb6teAX1RbKQmqtEF8kK3Z7LZ59qafCjB9eCRLiTVG3uxBxgKvRgbubRhqSKXnGGb1aoaqLrpMBDrVxga8"
    );
}

#[test]
fn bip44_address_hashes() {
    let seed = mnemonic::to_seed(ABANDON, "").unwrap();
    let root = HdNode::from_seed(seed.as_slice(), SECP256K1_NAME).unwrap();

    let bitcoin = root.derive_path(&path("m/44'/0'/0'/0/0")).unwrap();
    let address = base58check_decode("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", HasherType::Sha2d)
        .unwrap();
    assert_eq!(bitcoin.address_raw(0).unwrap(), address.as_slice());

    let ethereum = root.derive_path(&path("m/44'/60'/0'/0/0")).unwrap();
    assert_eq!(
        ethereum.ethereum_pubkey_hash().unwrap(),
        hex!("9858effd232b4033e47d90003d41ec34ecaeda94")
    );
}

#[test]
fn slip10_ed25519() {
    let root = HdNode::from_seed(&VECTOR1_SEED, ED25519_NAME).unwrap();
    assert_eq!(
        root.private_key().unwrap(),
        &hex!("2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7")
    );
    assert_eq!(
        root.chain_code(),
        &hex!("90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb")
    );

    let child = root.derive(H).unwrap();
    assert_eq!(
        child.private_key().unwrap(),
        &hex!("68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3")
    );
    assert_eq!(
        child.public_key().unwrap()[1..],
        hex!("8c8a13df77a28f3445213a0f432fde644acaa215fc72dcdf300d5efaa85d350c")
    );
}

#[test]
fn slip10_nist256p1() {
    let root = HdNode::from_seed(&VECTOR1_SEED, NIST256P1_NAME).unwrap();
    assert_eq!(
        root.chain_code(),
        &hex!("beeb672fe4621673f722f38529c07392fecaa61015c80c34f29ce8b41b3cb6ea")
    );
    assert_eq!(
        root.private_key().unwrap(),
        &hex!("612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2")
    );
    assert_eq!(
        root.public_key().unwrap(),
        hex!("0266874dc6ade47b3ecd096745ca09bcd29638dd52c2c12117b11ed3e458cfa9e8")
    );
}

struct CardanoExpected {
    chain_code: [u8; 32],
    private_key: [u8; 32],
    extension: [u8; 32],
    public_key: [u8; 32],
}

fn assert_cardano(node: &HdNode, expected: &CardanoExpected) {
    assert_eq!(node.chain_code(), &expected.chain_code);
    assert_eq!(node.private_key().unwrap(), &expected.private_key);
    assert_eq!(node.private_key_extension().unwrap(), &expected.extension);
    assert_eq!(node.public_key().unwrap()[1..], expected.public_key);
}

fn cardano_root() -> HdNode {
    let entropy = mnemonic::to_entropy(
        "ring crime symptom enough erupt lady behave ramp apart settle citizen junk",
    )
    .unwrap();
    assert_eq!(entropy.len(), 16);
    HdNode::from_seed_cardano(b"", &entropy).unwrap()
}

#[test]
fn cardano_root_vector() {
    assert_cardano(
        &cardano_root(),
        &CardanoExpected {
            chain_code: hex!("affbc325d9027c0f2d9f925b1dcf6c12bf5c1dd08904474066a4f2c00db56173"),
            private_key: hex!("08a14df748e477a69d21c97c56db151fc19e2521f31dd0ac5360f269e5b6ea46"),
            extension: hex!("daeb991f2d2128e2525415c56a07f4366baa26c1e48572a5e073934b6de35fbc"),
            public_key: hex!("9a1d04808b4c0682816961cf666e82a7fd35949658aba5354c517eccf12aacb4"),
        },
    );
}

#[test]
fn cardano_hardened_vectors() {
    let root = cardano_root();

    assert_cardano(
        &root.derive(H).unwrap(),
        &CardanoExpected {
            chain_code: hex!("104c6a0736e501c9bfe2966ba3773f5320495b19c3f2ed222234850af2ccd5b1"),
            private_key: hex!("6064bf06b2e981d7c9792b1482eeecd40ec3cfa12143f4a1f149d48ce8b6ea46"),
            extension: hex!("64aa9a16331f14c981b769efcf96addcc4c6db44047fe7a7feae0be23d33bf54"),
            public_key: hex!("c651c14a13c2311fc30a7acf244add1fdac3683e7ba89b4571e4cbcab509b915"),
        },
    );

    assert_cardano(
        &root.derive(H + 1).unwrap(),
        &CardanoExpected {
            chain_code: hex!("da99870d7e69de2a76f255ba8c7ed22428c7e5b0a8df978753c707c95ec3d4ca"),
            private_key: hex!("c85fa69f4a1891fd98d1d1fc5f0cf9b1d6e44b0e6906744ab23ea766edb6ea46"),
            extension: hex!("b4fc241feffe840b8a54a26ab447f5a5caa31032db3a8091fca14f38b86ed539"),
            public_key: hex!("5a5b0c92530cd366f05cf072509c806f904262c259e79a0080bbd5ee35706bb1"),
        },
    );

    let mut node = root.clone();
    node.private_ckd_cardano(H).unwrap();
    node.private_ckd_cardano(H + 1).unwrap();
    assert_cardano(
        &node,
        &CardanoExpected {
            chain_code: hex!("b40c44dfd9be08591b62be7f9991c85f812d8196927f3c824d9fcb17d275089e"),
            private_key: hex!("d064dcf1449d9c3e47f5b422680343561989035bf2e4e23fc34cb61fedb6ea46"),
            extension: hex!("a3071959013af95aaecf78a7a2e1b9838bbbc4864d6a8a2295243782078345cd"),
            public_key: hex!("aaaca5e7adc69a03ef1f5c017ed02879e8ca871df028461ed9bf19fb8fa15038"),
        },
    );
    assert_eq!(node.depth(), 2);
    assert_eq!(node.child_num(), H + 1);
}

#[test]
fn cardano_mixed_path_vector() {
    let path = DerivationPath::new(
        [H, H + 1, H + 2, H + 2, 0xbb9a_ca00]
            .into_iter()
            .map(Into::into)
            .collect(),
    );
    assert_cardano(
        &cardano_root().derive_path(&path).unwrap(),
        &CardanoExpected {
            chain_code: hex!("ff77c08d37471c1d4cedd3fae2642c009324d9712492efc74dedab09c9bf973c"),
            private_key: hex!("488f34840bba516f7920f91676b8681d0dd833b4ce14468e0810b255f9b6ea46"),
            extension: hex!("01eccef768a79859f824a1d3c3e35e131184e2940c3fca9a4c9b307741f65363"),
            public_key: hex!("148605be54585773b44ba87e79265149ae444c4cc37cb1f8db8c08482fba293b"),
        },
    );
}

#[test]
fn cardano_public_derivation_unsupported() {
    let root = cardano_root();
    let mut public = root.to_public().unwrap();
    assert!(matches!(public.public_ckd(0), Err(Error::InvalidDerivationStep(_))));
    assert!(matches!(
        public.private_ckd(H),
        Err(Error::InvalidDerivationStep(_))
    ));
}

#[test]
fn deserialize_rejects_corruption() {
    let root = HdNode::from_seed(&VECTOR1_SEED, SECP256K1_NAME).unwrap();
    let xprv = root.serialize_private(0, VERSION_XPRV).unwrap();

    // read the private string as if only the public version were known
    assert_eq!(
        HdNode::deserialize(&xprv, VERSION_XPUB, 0, SECP256K1_NAME).unwrap_err(),
        Error::UnknownVersion(VERSION_XPRV)
    );
    assert_eq!(
        HdNode::deserialize(&xprv[..xprv.len() - 1], VERSION_XPUB, VERSION_XPRV, SECP256K1_NAME)
            .unwrap_err(),
        Error::LengthOrChecksum
    );
    assert_eq!(
        HdNode::deserialize(&xprv, VERSION_XPUB, VERSION_XPRV, "secp256k2").unwrap_err(),
        Error::UnknownCurve
    );
}
