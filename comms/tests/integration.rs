use comms::{
    BlockCoord, CacheKey, DenseBlock, JobParameters, Key,
    msg::{Command, Msg, Payload},
};
use rand::Rng;
use tokio::io;

#[tokio::test]
async fn send_recv() {
    const SIZE: usize = 128;

    let msg = Msg::Control(Command::Evict {
        key: CacheKey("job-cache-0".into()),
    });

    let (one, two) = io::duplex(SIZE);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    tx.send(&msg).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let received: Msg = rx.recv().await.unwrap();
    assert_eq!(received, msg);
}

#[tokio::test]
async fn large_blocks_cross_a_small_pipe() {
    const SIZE: usize = 64;
    const HEIGHT: usize = 17;
    const WIDTH: usize = 31;

    let mut rng = rand::rng();
    let data: Vec<f64> = (0..HEIGHT * WIDTH).map(|_| rng.random()).collect();
    let block = DenseBlock::new(HEIGHT, WIDTH, BlockCoord::Row(5), data).unwrap();

    let (one, two) = io::duplex(SIZE);
    let (_, tx) = io::split(one);
    let (rx, _) = io::split(two);
    let (mut rx, mut tx) = comms::channel(rx, tx);

    let sent = vec![
        Msg::Data(Payload::JobConf(JobParameters::from_iter([("block_size", "64")]))),
        Msg::Data(Payload::DynamicBlock {
            key: CacheKey("k".into()),
            block: block.clone(),
        }),
        Msg::Data(Payload::RoundResult {
            round: 5,
            key: Key::Int(5),
            block,
        }),
    ];

    let expected = sent.clone();
    let send = async move {
        for msg in &sent {
            tx.send(msg).await.unwrap();
        }
    };

    let recv = async move {
        let mut out = Vec::new();
        for _ in 0..3 {
            out.push(rx.recv::<Msg>().await.unwrap());
        }
        out
    };

    let ((), received) = tokio::join!(send, recv);
    assert_eq!(received, expected);
}

#[tokio::test]
async fn garbage_frame_is_invalid_data() {
    use tokio::io::AsyncWriteExt;

    let (mut one, two) = io::duplex(64);
    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    one.write_all(&4u64.to_be_bytes()).await.unwrap();
    one.write_all(&[0, 0, 0, 77]).await.unwrap();

    let err = rx.recv::<Msg>().await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
