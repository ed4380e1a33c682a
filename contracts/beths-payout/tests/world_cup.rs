use soroban_sdk::{
    testutils::Address as _,
    token::{StellarAssetClient, TokenClient},
    vec, Address, Env, String,
};

use beths_payout::{BethsPayout, BethsPayoutClient, GameResult, GameState};

const KICK_OFF: u64 = 1_529_054_843;

fn create_token<'a>(env: &'a Env, token_admin: &Address) -> (Address, StellarAssetClient<'a>) {
    let token_contract = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token_client = StellarAssetClient::new(env, &token_contract.address());
    (token_contract.address(), token_client)
}

/// Two concurrent games, eight accounts, one of them betting on both.
#[test]
fn test_two_games_settle_and_pay_out() {
    let env = Env::default();
    env.mock_all_auths();

    let operator = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let (token_addr, token_sac) = create_token(&env, &token_admin);
    let token = TokenClient::new(&env, &token_addr);

    let contract_id = env.register(BethsPayout, ());
    let beths = BethsPayoutClient::new(&env, &contract_id);
    beths.init(&operator, &token_addr);

    let accounts: [Address; 7] = core::array::from_fn(|_| Address::generate(&env));
    for account in accounts.iter() {
        token_sac.mint(account, &100i128);
    }

    let france_spain = beths.create_game(
        &operator,
        &String::from_str(&env, "France"),
        &String::from_str(&env, "Spain"),
        &String::from_str(&env, "World cup match: France Vs Spain"),
        &KICK_OFF,
    );
    let usa_japan = beths.create_game(
        &operator,
        &String::from_str(&env, "USA"),
        &String::from_str(&env, "Japan"),
        &String::from_str(&env, "World cup match: USA Vs Japan"),
        &KICK_OFF,
    );
    assert_eq!(france_spain, 0);
    assert_eq!(usa_japan, 1);

    let info = beths.get_game_info(&france_spain);
    assert_eq!(info.team_a, String::from_str(&env, "France"));
    assert_eq!(info.team_b, String::from_str(&env, "Spain"));
    assert_eq!(info.state, GameState::Open);
    assert_eq!(info.created_at, KICK_OFF);

    // Game 0: 11 + 23 on France, 28 on Spain, 6 on the draw.
    beths.place_bet(&accounts[0], &france_spain, &1u32, &11i128);
    beths.place_bet(&accounts[1], &france_spain, &1u32, &23i128);
    beths.place_bet(&accounts[2], &france_spain, &3u32, &28i128);
    beths.place_bet(&accounts[3], &france_spain, &2u32, &6i128);

    let amounts = beths.get_game_amounts(&france_spain);
    assert_eq!(amounts.team_a_total, 34);
    assert_eq!(amounts.draw_total, 6);
    assert_eq!(amounts.team_b_total, 28);
    assert_eq!(amounts.bet_count, 4);
    assert_eq!(amounts.created_at, KICK_OFF);

    // Game 1: 6 + 8 + 14 on USA, 18 + 6 on Japan, 5 on the draw.
    beths.place_bet(&accounts[0], &usa_japan, &1u32, &6i128);
    beths.place_bet(&accounts[2], &usa_japan, &1u32, &8i128);
    beths.place_bet(&accounts[3], &usa_japan, &1u32, &14i128);
    beths.place_bet(&accounts[4], &usa_japan, &3u32, &18i128);
    beths.place_bet(&accounts[5], &usa_japan, &3u32, &6i128);
    beths.place_bet(&accounts[6], &usa_japan, &2u32, &5i128);

    let amounts = beths.get_game_amounts(&usa_japan);
    assert_eq!(amounts.team_a_total, 28);
    assert_eq!(amounts.draw_total, 5);
    assert_eq!(amounts.team_b_total, 24);
    assert_eq!(amounts.bet_count, 6);

    assert_eq!(token.balance(&contract_id), 68 + 57);

    beths.freeze_game(&operator, &france_spain);
    beths.close_game(&operator, &france_spain, &1u32);
    assert_eq!(beths.get_game_state(&france_spain), GameState::Closed);
    assert_eq!(beths.get_game_result(&france_spain), GameResult::TeamAWin);

    beths.freeze_game(&operator, &usa_japan);
    beths.close_game(&operator, &usa_japan, &3u32);
    assert_eq!(beths.get_game_state(&usa_japan), GameState::Closed);
    assert_eq!(beths.get_game_result(&usa_japan), GameResult::TeamBWin);

    // Account 0 holds one bet on each game.
    assert_eq!(beths.get_bets_by_address(&accounts[0]), vec![&env, 0u64, 4u64]);

    let mut paid = [0i128; 7];
    for (i, account) in accounts.iter().enumerate() {
        for bet_id in beths.get_bets_by_address(account).iter() {
            paid[i] += beths.withdraw(account, &bet_id);
        }
    }

    // France won: 11 + 11 * 34 / 34 and 23 + 23 * 34 / 34.
    // Japan won: 18 + floor(18 * 33 / 24) and 6 + floor(6 * 33 / 24).
    assert_eq!(paid, [22, 46, 0, 0, 42, 14, 0]);

    assert_eq!(beths.get_game(&france_spain).paid_out, 68);
    assert_eq!(beths.get_game(&usa_japan).paid_out, 56);

    // One token of rounding dust from game 1 stays behind.
    assert_eq!(token.balance(&contract_id), 1);
    assert_eq!(token.balance(&accounts[0]), 100 - 11 - 6 + 22);
    assert_eq!(token.balance(&accounts[4]), 100 - 18 + 42);
}

#[test]
fn test_every_bet_withdraws_exactly_once() {
    let env = Env::default();
    env.mock_all_auths();

    let operator = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let (token_addr, token_sac) = create_token(&env, &token_admin);
    let token = TokenClient::new(&env, &token_addr);

    let contract_id = env.register(BethsPayout, ());
    let beths = BethsPayoutClient::new(&env, &contract_id);
    beths.init(&operator, &token_addr);

    let game_id = beths.create_game(
        &operator,
        &String::from_str(&env, "Brazil"),
        &String::from_str(&env, "Germany"),
        &String::from_str(&env, "Semi-final"),
        &KICK_OFF,
    );

    let player = Address::generate(&env);
    token_sac.mint(&player, &1_000i128);

    let stakes = [(1u32, 7i128), (2, 13), (3, 29), (2, 31), (1, 3)];
    for (outcome, amount) in stakes.iter() {
        beths.place_bet(&player, &game_id, outcome, amount);
    }
    let collected: i128 = stakes.iter().map(|(_, amount)| amount).sum();

    beths.freeze_game(&operator, &game_id);
    beths.close_game(&operator, &game_id, &2u32);

    let mut total = 0i128;
    for bet_id in beths.get_bets_by_address(&player).iter() {
        total += beths.withdraw(&player, &bet_id);
        assert!(beths.try_withdraw(&player, &bet_id).is_err());
    }

    assert!(total <= collected);
    assert_eq!(token.balance(&contract_id), collected - total);
    assert_eq!(beths.get_game(&game_id).paid_out, total);
}
